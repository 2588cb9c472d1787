//! Personal decisions: the weighted lottery and manually recorded visits.

use crate::engine::DecisionEngine;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use munch_core::model::{
    CollectionId, Decision, DecisionDraft, DecisionKind, DecisionMethod, DecisionResult,
    RestaurantId, UserId,
};
use munch_core::weight;
use munch_store::{DecisionStore, HistoryQuery};
use std::collections::BTreeMap;

impl<S> DecisionEngine<S>
where
    S: DecisionStore,
{
    /// Draw a restaurant from the collection for `user_id`.
    ///
    /// Recently chosen restaurants are less likely to come up again. The
    /// new personal decision is written once, already completed, with the
    /// weights used for the draw kept as an audit snapshot.
    pub fn select_random(
        &self,
        collection_id: &CollectionId,
        user_id: &UserId,
        visit_date: DateTime<Utc>,
    ) -> Result<DecisionResult, EngineError> {
        let now = self.now();
        let restaurants = self.collection_restaurants(collection_id)?;
        if restaurants.is_empty() {
            return Err(EngineError::EmptyCollection(collection_id.clone()));
        }

        let history = self.history(&HistoryQuery::personal(
            collection_id,
            self.config.history_limit,
        ))?;
        let draw = self.weighted_draw(collection_id, &restaurants, &history, now)?;
        let prior = weight::selection_count(&draw.restaurant, &history);

        let result = DecisionResult {
            restaurant_id: draw.restaurant.clone(),
            selected_at: now,
            reasoning: format!(
                "Selected {} by weighted lottery: weight {:.2} of {:.2} total, {} previous selection{} in recent history",
                draw.restaurant,
                draw.weight,
                draw.total_weight,
                prior,
                if prior == 1 { "" } else { "s" }
            ),
            weights: draw.weights,
            tally: BTreeMap::new(),
        };

        let decision = self.store.create_decision(DecisionDraft {
            kind: DecisionKind::Personal,
            collection_id: collection_id.clone(),
            group_id: None,
            participants: vec![user_id.clone()],
            method: DecisionMethod::Random,
            deadline: now,
            visit_date,
            created_at: now,
            resolution: Some(result.clone()),
        })?;

        tracing::info!(
            decision = %decision.id,
            collection = %collection_id,
            user = %user_id,
            restaurant = %result.restaurant_id,
            "lottery decision completed"
        );
        self.notify_completed(&decision);
        Ok(result)
    }

    /// Record a visit that already happened so it counts toward fairness.
    pub fn record_manual_visit(
        &self,
        collection_id: &CollectionId,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
        visit_date: DateTime<Utc>,
    ) -> Result<Decision, EngineError> {
        let now = self.now();
        if visit_date > now {
            return Err(EngineError::VisitInFuture { visit_date });
        }
        let restaurants = self.collection_restaurants(collection_id)?;
        if !restaurants.contains(restaurant_id) {
            return Err(EngineError::RestaurantNotInCollection {
                collection: collection_id.clone(),
                restaurant: restaurant_id.clone(),
            });
        }

        let decision = self.store.create_decision(DecisionDraft {
            kind: DecisionKind::Personal,
            collection_id: collection_id.clone(),
            group_id: None,
            participants: vec![user_id.clone()],
            method: DecisionMethod::Manual,
            deadline: now,
            visit_date,
            created_at: now,
            resolution: Some(DecisionResult {
                restaurant_id: restaurant_id.clone(),
                selected_at: visit_date,
                reasoning: "Manually recorded visit".into(),
                weights: BTreeMap::new(),
                tally: BTreeMap::new(),
            }),
        })?;

        tracing::info!(
            decision = %decision.id,
            collection = %collection_id,
            restaurant = %restaurant_id,
            "manual visit recorded"
        );
        Ok(decision)
    }
}
