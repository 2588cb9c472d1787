use crate::adapter::{DecisionStore, HistoryQuery};
use crate::error::StoreError;
use crate::query;
use chrono::{DateTime, Utc};
use munch_core::model::{
    normalize_refs, Ballot, Collection, CollectionId, Decision, DecisionDraft, DecisionResult,
    DecisionStatus, Group, GroupId, Restaurant, RestaurantId,
};
use munch_core::serialize::salted_id;
use munch_core::DecisionId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub(crate) const DECISION_TAG: &str = "decision";

#[derive(Default)]
struct Tables {
    collections: HashMap<CollectionId, Collection>,
    restaurants: HashMap<RestaurantId, Restaurant>,
    groups: HashMap<GroupId, Group>,
    decisions: HashMap<DecisionId, Decision>,
}

/// Process-local store. Each primitive runs under one mutex, which gives
/// the same atomicity a document store provides per record.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panic mid-write cannot leave a half-applied record behind, every
        // primitive replaces whole values.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn put_collection(&self, collection: Collection) {
        self.tables()
            .collections
            .insert(collection.id.clone(), collection);
    }

    pub fn put_restaurant(&self, restaurant: Restaurant) {
        self.tables()
            .restaurants
            .insert(restaurant.id.clone(), restaurant);
    }

    pub fn put_group(&self, group: Group) {
        self.tables().groups.insert(group.id.clone(), group);
    }

    /// Insert a fully formed decision, e.g. imported history.
    pub fn put_decision(&self, decision: Decision) {
        self.tables()
            .decisions
            .insert(decision.id.clone(), decision);
    }

    fn transition<F>(&self, id: &DecisionId, apply: F) -> Result<Decision, StoreError>
    where
        F: FnOnce(&mut Decision),
    {
        let mut tables = self.tables();
        let decision = tables
            .decisions
            .get_mut(id)
            .ok_or_else(|| StoreError::DecisionNotFound(id.hex().to_string()))?;
        if decision.status != DecisionStatus::Active {
            return Err(StoreError::PreconditionFailed(format!(
                "decision {} is {}",
                id.short(),
                decision.status
            )));
        }
        apply(decision);
        Ok(decision.clone())
    }
}

impl DecisionStore for MemoryStore {
    fn get_collection(&self, id: &CollectionId) -> Result<Option<Collection>, StoreError> {
        Ok(self.tables().collections.get(id).cloned())
    }

    fn get_restaurants_in_collection(
        &self,
        id: &CollectionId,
    ) -> Result<Vec<RestaurantId>, StoreError> {
        let tables = self.tables();
        let collection = tables
            .collections
            .get(id)
            .ok_or_else(|| StoreError::CollectionNotFound(id.to_string()))?;
        Ok(normalize_refs(&collection.restaurants, |external_id| {
            tables
                .restaurants
                .values()
                .find(|r| r.external_id.as_deref() == Some(external_id))
                .map(|r| r.id.clone())
        }))
    }

    fn get_recent_completed_decisions(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<Decision>, StoreError> {
        let tables = self.tables();
        Ok(query::recent_completed(
            tables.decisions.values().cloned(),
            query,
        ))
    }

    fn create_decision(&self, draft: DecisionDraft) -> Result<Decision, StoreError> {
        let mut tables = self.tables();
        let id = loop {
            let id = salted_id(DECISION_TAG, &draft, rand::random())?;
            if !tables.decisions.contains_key(&id) {
                break id;
            }
        };
        let decision = draft.into_decision(id.clone());
        tables.decisions.insert(id, decision.clone());
        Ok(decision)
    }

    fn finalize_decision(
        &self,
        id: &DecisionId,
        result: DecisionResult,
    ) -> Result<Decision, StoreError> {
        self.transition(id, |d| {
            d.updated_at = d.updated_at.max(result.selected_at);
            d.status = DecisionStatus::Completed;
            d.result = Some(result);
        })
    }

    fn expire_decision(&self, id: &DecisionId, at: DateTime<Utc>) -> Result<Decision, StoreError> {
        self.transition(id, |d| {
            d.updated_at = d.updated_at.max(at);
            d.status = DecisionStatus::Expired;
        })
    }

    fn upsert_ballot(&self, id: &DecisionId, ballot: Ballot) -> Result<(), StoreError> {
        self.transition(id, |d| d.upsert_ballot(ballot)).map(|_| ())
    }

    fn get_decision(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        Ok(self.tables().decisions.get(id).cloned())
    }

    fn list_group_decisions(&self, group_id: &GroupId) -> Result<Vec<Decision>, StoreError> {
        let tables = self.tables();
        Ok(query::group_decisions(
            tables.decisions.values().cloned(),
            group_id,
        ))
    }

    fn get_group(&self, id: &GroupId) -> Result<Option<Group>, StoreError> {
        Ok(self.tables().groups.get(id).cloned())
    }
}
