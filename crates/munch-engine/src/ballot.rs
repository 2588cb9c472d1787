use crate::engine::DecisionEngine;
use crate::error::EngineError;
use munch_core::model::{Ballot, DecisionKind, DecisionStatus, RestaurantId, UserId};
use munch_core::DecisionId;
use munch_store::DecisionStore;
use serde::Serialize;

/// Acknowledgement for a submitted ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteReceipt {
    pub accepted: bool,
    /// The voter had an earlier ballot that this one replaced.
    pub replaced: bool,
}

impl<S> DecisionEngine<S>
where
    S: DecisionStore,
{
    /// Store `user_id`'s ranking for an active group decision.
    ///
    /// A later submission from the same user replaces the earlier one.
    /// Restaurant ids are not checked here; unknown ids are skipped when
    /// the votes are tallied.
    pub fn submit_group_vote(
        &self,
        decision_id: &DecisionId,
        user_id: &UserId,
        ranked_restaurant_ids: Vec<RestaurantId>,
    ) -> Result<VoteReceipt, EngineError> {
        let now = self.now();
        let decision = self.load_decision(decision_id)?;

        if decision.kind != DecisionKind::Group {
            return Err(EngineError::NotAGroupDecision(decision_id.clone()));
        }
        if decision.status_at(now) != DecisionStatus::Active {
            return Err(EngineError::NotActive(decision_id.clone()));
        }
        if !decision.is_participant(user_id) {
            return Err(EngineError::NotAParticipant {
                id: decision_id.clone(),
                user: user_id.clone(),
            });
        }

        let replaced = decision.ballot_for(user_id).is_some();
        let ranked = ranked_restaurant_ids.len();
        self.store
            .upsert_ballot(
                decision_id,
                Ballot {
                    user_id: user_id.clone(),
                    ranked_restaurant_ids,
                    submitted_at: now,
                },
            )
            .map_err(|e| EngineError::from_transition(decision_id, e))?;

        tracing::info!(
            decision = %decision_id,
            user = %user_id,
            ranked,
            replaced,
            "ballot accepted"
        );
        Ok(VoteReceipt {
            accepted: true,
            replaced,
        })
    }
}
