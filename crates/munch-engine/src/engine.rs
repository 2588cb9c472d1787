use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;
use crate::events::{DecisionEvents, EventError, NoopEvents};
use crate::random::{RandomSource, ThreadRandom};
use chrono::{DateTime, Utc};
use munch_core::model::{CollectionId, Decision, RestaurantId};
use munch_core::{draw, weight, DecisionId, EngineConfig};
use munch_store::{DecisionStore, HistoryQuery, StoreError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The decision engine: lottery, ballots, tally, and lifecycle over an
/// injected store.
///
/// Holds no mutable state of its own; any number of engines may share one
/// store.
pub struct DecisionEngine<S> {
    pub(crate) store: Arc<S>,
    pub(crate) config: EngineConfig,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    events: Arc<dyn DecisionEvents>,
}

/// Outcome of a weighted draw.
#[derive(Debug, Clone)]
pub(crate) struct Draw {
    pub restaurant: RestaurantId,
    pub weight: f64,
    pub total_weight: f64,
    pub weights: BTreeMap<RestaurantId, f64>,
}

impl<S> DecisionEngine<S>
where
    S: DecisionStore,
{
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandom),
            events: Arc::new(NoopEvents),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn DecisionEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn load_decision(&self, id: &DecisionId) -> Result<Decision, EngineError> {
        self.store
            .get_decision(id)?
            .ok_or_else(|| EngineError::DecisionNotFound(id.hex().to_string()))
    }

    /// Normalized member ids; fails if the collection is missing.
    pub(crate) fn collection_restaurants(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<RestaurantId>, EngineError> {
        if self.store.get_collection(collection_id)?.is_none() {
            return Err(EngineError::CollectionNotFound(collection_id.clone()));
        }
        match self.store.get_restaurants_in_collection(collection_id) {
            Ok(ids) => Ok(ids),
            Err(StoreError::CollectionNotFound(_)) => {
                Err(EngineError::CollectionNotFound(collection_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn history(&self, query: &HistoryQuery) -> Result<Vec<Decision>, EngineError> {
        Ok(self.store.get_recent_completed_decisions(query)?)
    }

    /// Weighted draw over `candidates` in their given order.
    ///
    /// Callers guarantee `candidates` is non-empty; an empty slice is
    /// reported against `collection_id`.
    pub(crate) fn weighted_draw(
        &self,
        collection_id: &CollectionId,
        candidates: &[RestaurantId],
        history: &[Decision],
        now: DateTime<Utc>,
    ) -> Result<Draw, EngineError> {
        let weighted = weight::weigh_all(candidates, history, now, &self.config.weights);
        let unit = self.random.unit();
        let restaurant = draw::weighted_pick(&weighted, unit)
            .cloned()
            .ok_or_else(|| EngineError::EmptyCollection(collection_id.clone()))?;
        let total_weight = draw::total_weight(&weighted);
        let weights: BTreeMap<RestaurantId, f64> = weighted.into_iter().collect();
        let weight = weights.get(&restaurant).copied().unwrap_or_default();
        tracing::debug!(
            collection = %collection_id,
            candidates = candidates.len(),
            total_weight,
            unit,
            selected = %restaurant,
            "weighted draw"
        );
        Ok(Draw {
            restaurant,
            weight,
            total_weight,
            weights,
        })
    }

    pub(crate) fn notify_started(&self, decision: &Decision) {
        log_event_failure(decision, "started", self.events.decision_started(decision));
    }

    pub(crate) fn notify_completed(&self, decision: &Decision) {
        log_event_failure(
            decision,
            "completed",
            self.events.decision_completed(decision),
        );
    }
}

fn log_event_failure(decision: &Decision, event: &str, outcome: Result<(), EventError>) {
    if let Err(e) = outcome {
        tracing::warn!(decision = %decision.id, event, error = %e, "decision event not delivered");
    }
}
