use crate::error::StoreError;
use chrono::{DateTime, Utc};
use munch_core::model::{
    Ballot, Collection, CollectionId, Decision, DecisionDraft, DecisionKind, DecisionResult,
    Group, GroupId, RestaurantId,
};
use munch_core::DecisionId;

/// Filter for loading weight history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub collection_id: CollectionId,
    pub kind: Option<DecisionKind>,
    pub group_id: Option<GroupId>,
    /// `None` loads everything.
    pub limit: Option<usize>,
}

impl HistoryQuery {
    /// Completed personal decisions for a collection, the lottery's history.
    pub fn personal(collection_id: &CollectionId, limit: usize) -> Self {
        Self {
            collection_id: collection_id.clone(),
            kind: Some(DecisionKind::Personal),
            group_id: None,
            limit: Some(limit),
        }
    }

    /// Completed decisions a group made over a collection.
    pub fn group(collection_id: &CollectionId, group_id: &GroupId, limit: usize) -> Self {
        Self {
            collection_id: collection_id.clone(),
            kind: Some(DecisionKind::Group),
            group_id: Some(group_id.clone()),
            limit: Some(limit),
        }
    }

    /// Every completed decision for a collection, any kind.
    pub fn all(collection_id: &CollectionId) -> Self {
        Self {
            collection_id: collection_id.clone(),
            kind: None,
            group_id: None,
            limit: None,
        }
    }

    pub fn matches(&self, decision: &Decision) -> bool {
        decision.result.is_some()
            && decision.collection_id == self.collection_id
            && self.kind.map_or(true, |k| decision.kind == k)
            && self
                .group_id
                .as_ref()
                .map_or(true, |g| decision.group_id.as_ref() == Some(g))
    }
}

/// Persistence contract the decision engine runs against.
///
/// Every mutation of a stored decision is a single atomic primitive:
/// creation, a per-user ballot upsert, or a status transition conditional
/// on the record still being active. Implementations must never rebuild
/// the ballot list from a stale read.
pub trait DecisionStore: Send + Sync {
    fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>, StoreError>;

    /// Normalized member ids in collection order.
    fn get_restaurants_in_collection(
        &self,
        id: &CollectionId,
    ) -> Result<Vec<RestaurantId>, StoreError>;

    /// Completed decisions matching `query`, most recent selection first.
    fn get_recent_completed_decisions(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<Decision>, StoreError>;

    /// Persist a new decision and assign its id.
    fn create_decision(&self, draft: DecisionDraft) -> Result<Decision, StoreError>;

    /// Set the result and move `active → completed`.
    ///
    /// Fails with [`StoreError::PreconditionFailed`] if the decision is no
    /// longer active.
    fn finalize_decision(
        &self,
        id: &DecisionId,
        result: DecisionResult,
    ) -> Result<Decision, StoreError>;

    /// Move `active → expired`, leaving the result unset. Same precondition
    /// as [`DecisionStore::finalize_decision`].
    fn expire_decision(&self, id: &DecisionId, at: DateTime<Utc>) -> Result<Decision, StoreError>;

    /// Insert or replace the ballot keyed by `(id, ballot.user_id)`.
    ///
    /// Fails with [`StoreError::PreconditionFailed`] if the decision is not
    /// active when the write happens.
    fn upsert_ballot(&self, id: &DecisionId, ballot: Ballot) -> Result<(), StoreError>;

    fn get_decision(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError>;

    /// All decisions of a group, most recently created first.
    fn list_group_decisions(&self, group_id: &GroupId) -> Result<Vec<Decision>, StoreError>;

    fn get_group(&self, id: &GroupId) -> Result<Option<Group>, StoreError>;
}
