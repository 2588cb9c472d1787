use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn munch(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("munch").unwrap();
    cmd.current_dir(dir)
        .env_remove("MUNCH_USER")
        .env_remove("MUNCH_LOG")
        .env_remove("MUNCH_HISTORY_LIMIT");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

/// Repository with restaurants `a` and `b` in collection `favs`, and group
/// `crew` administered by ana with member ben.
fn seeded_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    munch(root).arg("init").assert().success();
    for (id, name) in [("a", "Antojitos"), ("b", "Bao House")] {
        munch(root)
            .args(["restaurant", "add", id, "--name", name])
            .assert()
            .success();
    }
    munch(root)
        .args(["collection", "create", "favs", "--name", "Favourites", "--user", "ana"])
        .assert()
        .success();
    for id in ["a", "b"] {
        munch(root)
            .args(["collection", "add", "favs", id])
            .assert()
            .success();
    }
    munch(root)
        .args(["group", "create", "crew", "--name", "Lunch crew", "--member", "ben"])
        .env("MUNCH_USER", "ana")
        .assert()
        .success();
    dir
}

fn start_tiered(root: &Path) -> String {
    let decision = json_output(munch(root).args(["group-decision", "start", "favs", "crew"]));
    decision["id"].as_str().unwrap().to_string()
}

#[test]
fn init_creates_munch_dir() {
    let dir = TempDir::new().unwrap();
    munch(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains(".munch"));

    assert!(dir.path().join(".munch/config.json").exists());
    assert!(dir.path().join(".munch/decisions").exists());
    assert!(dir.path().join(".munch/ballots").exists());
}

#[test]
fn init_twice_fails() {
    let dir = TempDir::new().unwrap();
    munch(dir.path()).arg("init").assert().success();
    munch(dir.path()).arg("init").assert().failure();
}

#[test]
fn commands_outside_repository_fail() {
    let dir = TempDir::new().unwrap();
    munch(dir.path())
        .args(["stats", "favs"])
        .assert()
        .failure()
        .stderr(contains("not a munch repository"));
}

#[test]
fn collection_add_requires_registered_restaurant() {
    let dir = seeded_repo();
    munch(dir.path())
        .args(["collection", "add", "favs", "zz"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn collection_show_lists_members() {
    let dir = seeded_repo();
    munch(dir.path())
        .args(["collection", "show", "favs"])
        .assert()
        .success()
        .stdout(contains("Antojitos"))
        .stdout(contains("Bao House"));
}

#[test]
fn select_records_a_personal_pick() {
    let dir = seeded_repo();
    let root = dir.path();

    let result = json_output(munch(root).args(["select", "favs", "--user", "ben"]));
    let picked = result["restaurant_id"].as_str().unwrap().to_string();
    assert!(picked == "a" || picked == "b");
    assert!(result["weights"]["a"].is_number());
    assert!(result["weights"]["b"].is_number());

    let stats = json_output(munch(root).args(["stats", "favs"]));
    assert_eq!(stats["total_decisions"], 1);
    assert_eq!(stats["per_restaurant"][picked.as_str()]["selection_count"], 1);
}

#[test]
fn select_needs_acting_user() {
    let dir = seeded_repo();
    munch(dir.path())
        .args(["select", "favs"])
        .assert()
        .failure()
        .stderr(contains("no acting user"));
}

#[test]
fn select_from_empty_collection_fails() {
    let dir = seeded_repo();
    let root = dir.path();
    munch(root)
        .args(["collection", "create", "empty", "--name", "Nothing"])
        .assert()
        .success();
    munch(root)
        .args(["select", "empty", "--user", "ana"])
        .assert()
        .failure()
        .stderr(contains("has no restaurants"));
}

#[test]
fn invalid_history_limit_is_rejected() {
    let dir = seeded_repo();
    munch(dir.path())
        .args(["select", "favs", "--user", "ana"])
        .env("MUNCH_HISTORY_LIMIT", "lots")
        .assert()
        .failure()
        .stderr(contains("MUNCH_HISTORY_LIMIT"));
}

#[test]
fn manual_visit_shows_in_stats() {
    let dir = seeded_repo();
    let root = dir.path();
    munch(root)
        .args(["visit", "favs", "b", "--date", "2024-06-01", "--user", "ana"])
        .assert()
        .success()
        .stdout(contains("Recorded visit"));

    let stats = json_output(munch(root).args(["stats", "favs"]));
    assert_eq!(stats["per_restaurant"]["b"]["selection_count"], 1);
    assert_eq!(stats["per_restaurant"]["a"]["selection_count"], 0);

    munch(root)
        .args(["visit", "favs", "zz", "--user", "ana"])
        .assert()
        .failure()
        .stderr(contains("not in collection"));
}

#[test]
fn tiered_vote_end_to_end() {
    let dir = seeded_repo();
    let root = dir.path();
    let id = start_tiered(root);

    munch(root)
        .args(["vote", &id, "a", "b", "--user", "ana"])
        .assert()
        .success()
        .stdout(contains("Recorded"));
    munch(root)
        .args(["vote", &id[..8], "b", "--user", "ben"])
        .assert()
        .success();
    let receipt = json_output(munch(root).args(["vote", &id, "a", "--user", "ben"]));
    assert_eq!(receipt["replaced"], true);

    let result = json_output(munch(root).args(["complete", &id]));
    assert_eq!(result["restaurant_id"], "a");
    assert_eq!(result["tally"]["a"], 6);
    assert_eq!(result["tally"]["b"], 2);

    munch(root)
        .args(["complete", &id])
        .assert()
        .failure()
        .stderr(contains("not active"));

    munch(root)
        .args(["show", &id[..8]])
        .assert()
        .success()
        .stdout(contains("completed"))
        .stdout(contains("ana: a > b"));

    munch(root)
        .args(["list", "crew"])
        .assert()
        .success()
        .stdout(contains(&id[..8]));
}

#[test]
fn outsiders_cannot_vote() {
    let dir = seeded_repo();
    let root = dir.path();
    let id = start_tiered(root);
    munch(root)
        .args(["vote", &id, "a", "--user", "mallory"])
        .assert()
        .failure()
        .stderr(contains("not a participant"));
}

#[test]
fn complete_without_votes_fails() {
    let dir = seeded_repo();
    let root = dir.path();
    let id = start_tiered(root);
    munch(root)
        .args(["complete", &id])
        .assert()
        .failure()
        .stderr(contains("no votes"));
}

#[test]
fn only_admins_close() {
    let dir = seeded_repo();
    let root = dir.path();
    let id = start_tiered(root);

    munch(root)
        .args(["close", &id, "--user", "ben"])
        .assert()
        .failure()
        .stderr(contains("not an admin"));

    let closed = json_output(munch(root).args(["close", &id, "--user", "ana"]));
    assert_eq!(closed["status"], "expired");
    assert!(closed.get("result").is_none());

    munch(root)
        .args(["vote", &id, "a", "--user", "ben"])
        .assert()
        .failure()
        .stderr(contains("not active"));
}

#[test]
fn expire_waits_for_deadline() {
    let dir = seeded_repo();
    let root = dir.path();
    let id = start_tiered(root);
    munch(root)
        .args(["expire", &id])
        .assert()
        .failure()
        .stderr(contains("open until"));
}

#[test]
fn random_group_decision_resolves() {
    let dir = seeded_repo();
    let root = dir.path();
    let decision = json_output(munch(root).args([
        "group-decision",
        "start",
        "favs",
        "crew",
        "--method",
        "random",
        "--participant",
        "ana",
    ]));
    assert_eq!(decision["participants"], serde_json::json!(["ana"]));
    let id = decision["id"].as_str().unwrap();

    munch(root)
        .args(["complete", id])
        .assert()
        .failure()
        .stderr(contains("not tiered voting"));

    let result = json_output(munch(root).args(["resolve", id]));
    let picked = result["restaurant_id"].as_str().unwrap();
    assert!(picked == "a" || picked == "b");
}

#[test]
fn unknown_method_is_rejected() {
    let dir = seeded_repo();
    munch(dir.path())
        .args(["group-decision", "start", "favs", "crew", "--method", "coin"])
        .assert()
        .failure()
        .stderr(contains("unknown method"));
}

#[test]
fn verbose_reports_decision_events() {
    let dir = seeded_repo();
    let root = dir.path();

    let output = munch(root)
        .args(["group-decision", "start", "favs", "crew", "--json", "--verbose"])
        .assert()
        .success()
        .stderr(contains("event: decision_started"))
        .get_output()
        .stdout
        .clone();
    let decision: Value = serde_json::from_slice(&output).unwrap();
    let id = decision["id"].as_str().unwrap().to_string();

    munch(root)
        .args(["vote", &id, "b", "--user", "ana"])
        .assert()
        .success();
    munch(root)
        .args(["complete", &id, "--verbose"])
        .assert()
        .success()
        .stderr(contains(format!("event: decision_completed {}", &id[..8])));

    munch(root)
        .args(["select", "favs", "--user", "ana"])
        .assert()
        .success()
        .stderr(contains("event:").not());
}
