//! Resolving group decisions: the ranked-choice tally and the group lottery.

use crate::engine::DecisionEngine;
use crate::error::EngineError;
use munch_core::model::{
    Decision, DecisionKind, DecisionMethod, DecisionResult, DecisionStatus, GroupId,
};
use munch_core::tally::{score_ballots, TallyOutcome};
use munch_core::DecisionId;
use munch_store::{DecisionStore, HistoryQuery};
use std::collections::BTreeMap;

impl<S> DecisionEngine<S>
where
    S: DecisionStore,
{
    /// Tally the ballots of a tiered decision and complete it.
    ///
    /// Ties on points go to a weighted draw among the tied restaurants,
    /// using the group's own decision history for the weights.
    pub fn complete_tiered_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<DecisionResult, EngineError> {
        let now = self.now();
        let decision = self.load_decision(decision_id)?;

        if decision.method != DecisionMethod::Tiered {
            return Err(EngineError::NotATieredDecision {
                id: decision_id.clone(),
                method: decision.method,
            });
        }
        if decision.status != DecisionStatus::Active {
            return Err(EngineError::NotActive(decision_id.clone()));
        }
        if decision.ballots.is_empty() {
            return Err(EngineError::NoVotesSubmitted(decision_id.clone()));
        }

        let candidates = self.collection_restaurants(&decision.collection_id)?;
        let tally = score_ballots(&decision.ballots, &candidates);
        let outcome = tally
            .outcome()
            .ok_or_else(|| EngineError::NoVotesSubmitted(decision_id.clone()))?;
        tracing::debug!(decision = %decision_id, scores = %tally.summary(), "ballots tallied");

        let header = format!(
            "Ranked-choice tally of {} ballot{}: {}.",
            tally.counted_ballots,
            if tally.counted_ballots == 1 { "" } else { "s" },
            tally.summary()
        );

        let (restaurant_id, reasoning, weights) = match outcome {
            TallyOutcome::Winner { restaurant, points } => {
                let reasoning = format!("{header} {restaurant} wins with {points} points.");
                (restaurant, reasoning, BTreeMap::new())
            }
            TallyOutcome::Tie {
                restaurants,
                points,
            } => {
                let history = self.group_history(&decision)?;
                let draw =
                    self.weighted_draw(&decision.collection_id, &restaurants, &history, now)?;
                let tied = restaurants
                    .iter()
                    .map(|r| {
                        let w = draw.weights.get(r).copied().unwrap_or_default();
                        format!("{} ({:.2})", r, w)
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let reasoning = format!(
                    "{header} Tie at {points} points between {tied}, broken by weighted draw: {} selected.",
                    draw.restaurant
                );
                (draw.restaurant, reasoning, draw.weights)
            }
        };

        let result = DecisionResult {
            restaurant_id,
            selected_at: now,
            reasoning,
            weights,
            tally: tally.scores.clone(),
        };
        self.finish(decision_id, result)
    }

    /// Resolve a group decision created with the random method.
    pub fn resolve_random_group_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<DecisionResult, EngineError> {
        let now = self.now();
        let decision = self.load_decision(decision_id)?;

        if decision.kind != DecisionKind::Group {
            return Err(EngineError::NotAGroupDecision(decision_id.clone()));
        }
        if decision.method != DecisionMethod::Random {
            return Err(EngineError::NotARandomDecision {
                id: decision_id.clone(),
                method: decision.method,
            });
        }
        if decision.status != DecisionStatus::Active {
            return Err(EngineError::NotActive(decision_id.clone()));
        }

        let candidates = self.collection_restaurants(&decision.collection_id)?;
        if candidates.is_empty() {
            return Err(EngineError::EmptyCollection(decision.collection_id.clone()));
        }
        let history = self.group_history(&decision)?;
        let draw = self.weighted_draw(&decision.collection_id, &candidates, &history, now)?;
        let result = DecisionResult {
            restaurant_id: draw.restaurant.clone(),
            selected_at: now,
            reasoning: format!(
                "Selected {} by weighted group lottery: weight {:.2} of {:.2} total",
                draw.restaurant, draw.weight, draw.total_weight
            ),
            weights: draw.weights,
            tally: BTreeMap::new(),
        };
        self.finish(decision_id, result)
    }

    fn group_history(&self, decision: &Decision) -> Result<Vec<Decision>, EngineError> {
        match &decision.group_id {
            Some(group_id) => self.history(&HistoryQuery::group(
                &decision.collection_id,
                group_id,
                self.config.history_limit,
            )),
            None => Err(EngineError::NotAGroupDecision(decision.id.clone())),
        }
    }

    /// Conditional `active → completed` write, then the completion event.
    fn finish(
        &self,
        decision_id: &DecisionId,
        result: DecisionResult,
    ) -> Result<DecisionResult, EngineError> {
        let completed = self
            .store
            .finalize_decision(decision_id, result)
            .map_err(|e| EngineError::from_transition(decision_id, e))?;
        let result = completed
            .result
            .clone()
            .ok_or_else(|| EngineError::NotActive(decision_id.clone()))?;

        tracing::info!(
            decision = %decision_id,
            group = %completed.group_id.as_ref().map(GroupId::as_str).unwrap_or("-"),
            restaurant = %result.restaurant_id,
            method = %completed.method,
            "group decision completed"
        );
        self.notify_completed(&completed);
        Ok(result)
    }
}
