use super::common::*;
use crate::EngineError;
use chrono::Duration;
use munch_core::model::DecisionKind;

#[test]
fn statistics_cover_every_restaurant() {
    let fx = fixture(&["a", "b", "c"]);
    fx.seed_pick(DecisionKind::Personal, "a", 10);
    fx.seed_pick(DecisionKind::Personal, "a", 3);
    fx.seed_pick(DecisionKind::Group, "b", 1);

    let stats = fx.engine.get_statistics(&COLLECTION.into()).unwrap();
    assert_eq!(stats.collection_id.as_str(), COLLECTION);
    assert_eq!(stats.total_decisions, 3);
    assert_eq!(stats.per_restaurant.len(), 3);

    let a = &stats.per_restaurant[&rid("a")];
    assert_eq!(a.selection_count, 2);
    assert_eq!(a.last_selected, Some(now() - Duration::days(3)));
    assert!((a.current_weight - 0.19).abs() < 1e-9);

    // Group picks count, but only personal history drives the lottery.
    let b = &stats.per_restaurant[&rid("b")];
    assert_eq!(b.selection_count, 1);
    assert_eq!(b.last_selected, Some(now() - Duration::days(1)));
    assert_eq!(b.current_weight, 1.0);

    let c = &stats.per_restaurant[&rid("c")];
    assert_eq!(c.selection_count, 0);
    assert_eq!(c.last_selected, None);
    assert_eq!(c.current_weight, 1.0);
}

#[test]
fn statistics_follow_new_selections() {
    let fx = fixture(&["a", "b"]);
    let picked = fx
        .engine
        .select_random(&COLLECTION.into(), &uid("ana"), now())
        .unwrap()
        .restaurant_id;

    let stats = fx.engine.get_statistics(&COLLECTION.into()).unwrap();
    assert_eq!(stats.total_decisions, 1);
    let entry = &stats.per_restaurant[&picked];
    assert_eq!(entry.selection_count, 1);
    assert_eq!(entry.last_selected, Some(now()));
    assert!((entry.current_weight - 0.1).abs() < 1e-9);
}

#[test]
fn open_decisions_are_not_counted() {
    let fx = fixture(&["a"]);
    let decision = fx.open_tiered(&["ana"]);
    fx.vote(&decision, "ana", &["a"]);
    assert_eq!(
        fx.engine
            .get_statistics(&COLLECTION.into())
            .unwrap()
            .total_decisions,
        0
    );
    fx.engine.complete_tiered_decision(&decision.id).unwrap();
    assert_eq!(
        fx.engine
            .get_statistics(&COLLECTION.into())
            .unwrap()
            .total_decisions,
        1
    );
}

#[test]
fn statistics_need_the_collection() {
    let fx = fixture(&["a"]);
    let err = fx.engine.get_statistics(&"missing".into()).unwrap_err();
    assert!(matches!(err, EngineError::CollectionNotFound(_)));
}
