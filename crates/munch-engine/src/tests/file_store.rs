//! The same flows against the file-backed repository.

use super::common::*;
use crate::{DecisionEngine, EngineError, ManualClock, SeededRandom};
use chrono::Duration;
use munch_core::model::{
    Collection, DecisionMethod, DecisionStatus, Group, Restaurant, RestaurantRef,
};
use munch_core::EngineConfig;
use munch_store::Repository;
use std::sync::Arc;
use tempfile::TempDir;

fn repo_engine() -> (TempDir, DecisionEngine<Repository>) {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    for (id, ext) in [("a", None), ("b", Some("ext-b"))] {
        repo.put_restaurant(&Restaurant {
            id: rid(id),
            name: id.to_uppercase(),
            external_id: ext.map(String::from),
            cuisine: None,
        })
        .unwrap();
    }
    repo.put_collection(&Collection {
        id: COLLECTION.into(),
        name: "Favourites".into(),
        owner: None,
        restaurants: vec![
            RestaurantRef::Plain(rid("a")),
            RestaurantRef::External {
                external_id: "ext-b".into(),
            },
        ],
        created_at: now(),
    })
    .unwrap();
    repo.put_group(&Group {
        id: GROUP.into(),
        name: "Lunch crew".into(),
        admins: vec![uid(ADMIN)],
        members: vec![uid("ben")],
    })
    .unwrap();

    let engine = DecisionEngine::new(Arc::new(repo), EngineConfig::default())
        .with_clock(Arc::new(ManualClock::new(now())))
        .with_random(Arc::new(SeededRandom::new(7)));
    (dir, engine)
}

#[test]
fn external_refs_resolve_through_registry() {
    let (_dir, engine) = repo_engine();
    let result = engine
        .select_random(&COLLECTION.into(), &uid("ana"), now())
        .unwrap();
    let mut drawn: Vec<_> = result.weights.keys().cloned().collect();
    drawn.sort();
    assert_eq!(drawn, ranking(&["a", "b"]));
}

#[test]
fn tiered_flow_persists() {
    let (_dir, engine) = repo_engine();
    let decision = engine
        .create_group_decision(
            &COLLECTION.into(),
            &GROUP.into(),
            vec![uid("ana"), uid("ben")],
            DecisionMethod::Tiered,
            now() + Duration::hours(6),
            2,
        )
        .unwrap();
    engine
        .submit_group_vote(&decision.id, &uid("ana"), ranking(&["b", "a"]))
        .unwrap();
    engine
        .submit_group_vote(&decision.id, &uid("ben"), ranking(&["b"]))
        .unwrap();

    let result = engine.complete_tiered_decision(&decision.id).unwrap();
    assert_eq!(result.restaurant_id, rid("b"));

    let stored = engine.get_decision(&decision.id).unwrap();
    assert_eq!(stored.status, DecisionStatus::Completed);
    assert_eq!(stored.ballots.len(), 2);
    assert!(stored.invariant_violations().is_empty());

    let err = engine.complete_tiered_decision(&decision.id).unwrap_err();
    assert!(matches!(err, EngineError::NotActive(_)));
    assert_eq!(engine.list_group_decisions(&GROUP.into()).unwrap().len(), 1);
    assert_eq!(
        engine
            .store()
            .resolve_decision(decision.id.short())
            .unwrap(),
        decision.id
    );
}

#[test]
fn concurrent_ballots_on_disk_are_all_kept() {
    let (_dir, engine) = repo_engine();
    let voters: Vec<String> = (0..8).map(|i| format!("voter-{i}")).collect();
    let decision = engine
        .create_group_decision(
            &COLLECTION.into(),
            &GROUP.into(),
            voters.iter().map(|v| uid(v)).collect(),
            DecisionMethod::Tiered,
            now(),
            2,
        )
        .unwrap();

    std::thread::scope(|s| {
        for voter in &voters {
            let engine = &engine;
            let id = &decision.id;
            s.spawn(move || {
                engine
                    .submit_group_vote(id, &uid(voter), ranking(&["a"]))
                    .unwrap()
            });
        }
    });

    let stored = engine.get_decision(&decision.id).unwrap();
    assert_eq!(stored.ballots.len(), 8);
}
