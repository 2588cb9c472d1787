use crate::{
    DecisionEngine, DecisionEvents, EventError, ManualClock, RandomSource, RecordingEvents,
    SeededRandom,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use munch_core::model::{
    Collection, Decision, DecisionDraft, DecisionKind, DecisionMethod, DecisionResult, Group,
    RestaurantId, RestaurantRef, UserId,
};
use munch_core::{DecisionId, EngineConfig};
use munch_store::MemoryStore;
use std::collections::BTreeMap;
use std::sync::Arc;

pub(super) const COLLECTION: &str = "favs";
pub(super) const EMPTY_COLLECTION: &str = "empty";
pub(super) const GROUP: &str = "crew";
pub(super) const ADMIN: &str = "ana";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub(super) fn rid(id: &str) -> RestaurantId {
    RestaurantId::from(id)
}

pub(super) fn uid(id: &str) -> UserId {
    UserId::from(id)
}

pub(super) fn ranking(ids: &[&str]) -> Vec<RestaurantId> {
    ids.iter().map(|r| rid(r)).collect()
}

/// Always returns the same unit draw.
pub(super) struct FixedUnit(pub f64);

impl RandomSource for FixedUnit {
    fn unit(&self) -> f64 {
        self.0
    }
}

/// An event sink whose transport is always down.
pub(super) struct FailingEvents;

impl DecisionEvents for FailingEvents {
    fn decision_started(&self, _decision: &Decision) -> Result<(), EventError> {
        Err(EventError::Transport("connection refused".into()))
    }

    fn decision_completed(&self, _decision: &Decision) -> Result<(), EventError> {
        Err(EventError::Transport("connection refused".into()))
    }
}

pub(super) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<RecordingEvents>,
    pub engine: DecisionEngine<MemoryStore>,
}

impl Fixture {
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.engine = self.engine.with_random(random);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn DecisionEvents>) -> Self {
        self.engine = self.engine.with_events(events);
        self
    }

    pub fn with_config(self, config: EngineConfig) -> Self {
        let engine = DecisionEngine::new(Arc::clone(&self.store), config)
            .with_clock(self.clock.clone())
            .with_random(Arc::new(SeededRandom::new(7)))
            .with_events(self.events.clone());
        Self { engine, ..self }
    }

    /// Store a completed decision for `restaurant`, picked `days_ago`.
    pub fn seed_pick(&self, kind: DecisionKind, restaurant: &str, days_ago: i64) -> Decision {
        let selected_at = now() - Duration::days(days_ago);
        let draft = DecisionDraft {
            kind,
            collection_id: COLLECTION.into(),
            group_id: (kind == DecisionKind::Group).then(|| GROUP.into()),
            participants: vec![uid(ADMIN)],
            method: DecisionMethod::Random,
            deadline: selected_at,
            visit_date: selected_at,
            created_at: selected_at,
            resolution: Some(DecisionResult {
                restaurant_id: rid(restaurant),
                selected_at,
                reasoning: "seeded".into(),
                weights: BTreeMap::new(),
                tally: BTreeMap::new(),
            }),
        };
        let id = DecisionId::hash(format!("{kind:?}{restaurant}{days_ago}").as_bytes());
        let decision = draft.into_decision(id);
        self.store.put_decision(decision.clone());
        decision
    }

    pub fn open_tiered(&self, participants: &[&str]) -> Decision {
        self.engine
            .create_group_decision(
                &COLLECTION.into(),
                &GROUP.into(),
                participants.iter().map(|p| uid(p)).collect(),
                DecisionMethod::Tiered,
                now() + Duration::hours(6),
                2,
            )
            .unwrap()
    }

    pub fn vote(&self, decision: &Decision, user: &str, ids: &[&str]) {
        self.engine
            .submit_group_vote(&decision.id, &uid(user), ranking(ids))
            .unwrap();
    }
}

/// Collection `favs` with the given restaurants, an empty collection, and
/// group `crew` administered by `ana`.
pub(super) fn fixture(restaurants: &[&str]) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    store.put_collection(Collection {
        id: COLLECTION.into(),
        name: "Favourites".into(),
        owner: Some(uid(ADMIN)),
        restaurants: restaurants
            .iter()
            .map(|r| RestaurantRef::Plain(rid(r)))
            .collect(),
        created_at: now() - Duration::days(90),
    });
    store.put_collection(Collection {
        id: EMPTY_COLLECTION.into(),
        name: "Nothing yet".into(),
        owner: None,
        restaurants: vec![],
        created_at: now() - Duration::days(90),
    });
    store.put_group(Group {
        id: GROUP.into(),
        name: "Lunch crew".into(),
        admins: vec![uid(ADMIN)],
        members: vec![uid("ben"), uid("cy")],
    });

    let clock = Arc::new(ManualClock::new(now()));
    let events = Arc::new(RecordingEvents::new());
    let engine = DecisionEngine::new(Arc::clone(&store), EngineConfig::default())
        .with_clock(clock.clone())
        .with_random(Arc::new(SeededRandom::new(7)))
        .with_events(events.clone());

    Fixture {
        store,
        clock,
        events,
        engine,
    }
}
