//! Creation and termination of group decisions.
//!
//! `active` is the only non-terminal state. A decision leaves it once:
//! to `completed` through a tally or draw, or to `expired` through an
//! admin close or an overdue deadline. Expiry is never scheduled; a past
//! deadline is noticed when someone reads the decision.

use crate::engine::DecisionEngine;
use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc};
use munch_core::model::{
    CollectionId, Decision, DecisionDraft, DecisionKind, DecisionMethod, GroupId, UserId,
};
use munch_core::DecisionId;
use munch_store::DecisionStore;
use std::collections::HashSet;

impl<S> DecisionEngine<S>
where
    S: DecisionStore,
{
    /// Open a group decision for voting (tiered) or a later draw (random).
    pub fn create_group_decision(
        &self,
        collection_id: &CollectionId,
        group_id: &GroupId,
        participants: Vec<UserId>,
        method: DecisionMethod,
        visit_date: DateTime<Utc>,
        deadline_hours: i64,
    ) -> Result<Decision, EngineError> {
        let now = self.now();

        let mut seen = HashSet::new();
        let participants: Vec<UserId> = participants
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        if participants.is_empty() {
            return Err(EngineError::NoParticipants);
        }
        let deadline = Some(deadline_hours)
            .filter(|h| *h > 0)
            .and_then(Duration::try_hours)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(EngineError::InvalidDeadline(deadline_hours))?;
        if method == DecisionMethod::Manual {
            return Err(EngineError::UnsupportedMethod(method));
        }
        if self.store.get_group(group_id)?.is_none() {
            return Err(EngineError::GroupNotFound(group_id.clone()));
        }
        if self.store.get_collection(collection_id)?.is_none() {
            return Err(EngineError::CollectionNotFound(collection_id.clone()));
        }

        let decision = self.store.create_decision(DecisionDraft {
            kind: DecisionKind::Group,
            collection_id: collection_id.clone(),
            group_id: Some(group_id.clone()),
            participants,
            method,
            deadline,
            visit_date,
            created_at: now,
            resolution: None,
        })?;

        tracing::info!(
            decision = %decision.id,
            group = %group_id,
            collection = %collection_id,
            method = %method,
            participants = decision.participants.len(),
            deadline = %decision.deadline,
            "group decision started"
        );
        self.notify_started(&decision);
        Ok(decision)
    }

    /// Admin close: `active → expired` with no result.
    pub fn close_group_decision(
        &self,
        decision_id: &DecisionId,
        by_user: &UserId,
    ) -> Result<Decision, EngineError> {
        let now = self.now();
        let decision = self.load_decision(decision_id)?;

        if decision.kind != DecisionKind::Group {
            return Err(EngineError::NotAGroupDecision(decision_id.clone()));
        }
        if decision.status.is_terminal() {
            return Err(EngineError::NotActive(decision_id.clone()));
        }
        let group_id = decision
            .group_id
            .as_ref()
            .ok_or_else(|| EngineError::NotAGroupDecision(decision_id.clone()))?;
        let group = self
            .store
            .get_group(group_id)?
            .ok_or_else(|| EngineError::GroupNotFound(group_id.clone()))?;
        if !group.is_admin(by_user) {
            return Err(EngineError::NotAdmin {
                group: group_id.clone(),
                user: by_user.clone(),
            });
        }

        let closed = self
            .store
            .expire_decision(decision_id, now)
            .map_err(|e| EngineError::from_transition(decision_id, e))?;
        tracing::info!(decision = %decision_id, by = %by_user, "group decision closed");
        Ok(closed)
    }

    /// Persist the expiry of an active decision whose deadline has passed.
    pub fn expire_overdue(&self, decision_id: &DecisionId) -> Result<Decision, EngineError> {
        let now = self.now();
        let decision = self.load_decision(decision_id)?;

        if decision.status.is_terminal() {
            return Err(EngineError::NotActive(decision_id.clone()));
        }
        if decision.deadline >= now {
            return Err(EngineError::DeadlineNotReached {
                id: decision_id.clone(),
                deadline: decision.deadline,
            });
        }

        let expired = self
            .store
            .expire_decision(decision_id, now)
            .map_err(|e| EngineError::from_transition(decision_id, e))?;
        tracing::info!(
            decision = %decision_id,
            deadline = %decision.deadline,
            "overdue decision expired"
        );
        Ok(expired)
    }

    /// Every decision of the group, newest first, whatever its status.
    pub fn list_group_decisions(&self, group_id: &GroupId) -> Result<Vec<Decision>, EngineError> {
        Ok(self.store.list_group_decisions(group_id)?)
    }

    pub fn get_decision(&self, decision_id: &DecisionId) -> Result<Decision, EngineError> {
        self.load_decision(decision_id)
    }
}
