//! Shared plumbing for commands: opening the repository, building the
//! engine, and parsing user-facing arguments.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use munch_core::model::UserId;
use munch_core::DecisionId;
use munch_engine::{DecisionEngine, DecisionEvent, RecordingEvents};
use munch_store::Repository;
use std::env;
use std::sync::{Arc, OnceLock};

const USER_ENV: &str = "MUNCH_USER";
const HISTORY_LIMIT_ENV: &str = "MUNCH_HISTORY_LIMIT";

/// Set once by `--verbose`; engines built afterwards report into it.
static EVENTS: OnceLock<Arc<RecordingEvents>> = OnceLock::new();

pub fn repository() -> Result<Repository> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    Repository::discover(&cwd).context("not a munch repository")
}

/// Engine over the discovered repository, config overrides applied.
pub fn engine() -> Result<DecisionEngine<Repository>> {
    let repo = repository()?;
    let mut config = repo.config().context("failed to read repository config")?.engine;
    if let Ok(raw) = env::var(HISTORY_LIMIT_ENV) {
        config.history_limit = raw.trim().parse().with_context(|| {
            format!("{} must be a non-negative integer, got '{}'", HISTORY_LIMIT_ENV, raw)
        })?;
    }
    tracing::debug!(
        history_limit = config.history_limit,
        root = %repo.root().display(),
        "engine configured"
    );
    let engine = DecisionEngine::new(Arc::new(repo), config);
    Ok(match EVENTS.get() {
        Some(events) => engine.with_events(events.clone()),
        None => engine,
    })
}

pub fn record_events() {
    EVENTS.get_or_init(|| Arc::new(RecordingEvents::new()));
}

/// Events emitted since `record_events`, oldest first.
pub fn recorded_events() -> Vec<DecisionEvent> {
    EVENTS.get().map(|events| events.events()).unwrap_or_default()
}

pub fn event_line(event: &DecisionEvent) -> String {
    match event {
        DecisionEvent::Started(id) => format!("event: decision_started {}", id),
        DecisionEvent::Completed(id) => format!("event: decision_completed {}", id),
    }
}

pub fn configured_log_level() -> String {
    repository()
        .and_then(|repo| Ok(repo.config()?.log_level))
        .unwrap_or_else(|_| "warn".to_string())
}

pub fn acting_user(flag: Option<String>) -> Result<UserId> {
    let name = match flag {
        Some(name) => name,
        None => env::var(USER_ENV)
            .with_context(|| format!("no acting user: pass --user or set {}", USER_ENV))?,
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("acting user cannot be empty");
    }
    Ok(UserId::from(name))
}

/// Parse an RFC 3339 timestamp or a bare date (noon UTC); `None` is now.
pub fn parse_when(raw: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}': expected RFC 3339 or YYYY-MM-DD", raw))?;
    date.and_hms_opt(12, 0, 0)
        .map(|at| at.and_utc())
        .with_context(|| format!("invalid date '{}'", raw))
}

pub fn resolve_id(engine: &DecisionEngine<Repository>, prefix: &str) -> Result<DecisionId> {
    engine
        .store()
        .resolve_decision(prefix)
        .with_context(|| format!("decision '{}' not found", prefix))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
