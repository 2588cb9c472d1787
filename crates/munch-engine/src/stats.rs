use crate::engine::DecisionEngine;
use crate::error::EngineError;
use munch_core::model::CollectionId;
use munch_core::stats::{collection_statistics, CollectionStatistics};
use munch_store::{DecisionStore, HistoryQuery};

impl<S> DecisionEngine<S>
where
    S: DecisionStore,
{
    /// Selection counts, last pick and current lottery weight per restaurant.
    pub fn get_statistics(
        &self,
        collection_id: &CollectionId,
    ) -> Result<CollectionStatistics, EngineError> {
        let now = self.now();
        let restaurants = self.collection_restaurants(collection_id)?;
        let completed = self.history(&HistoryQuery::all(collection_id))?;
        let weight_history = self.history(&HistoryQuery::personal(
            collection_id,
            self.config.history_limit,
        ))?;
        Ok(collection_statistics(
            collection_id,
            &restaurants,
            &completed,
            &weight_history,
            now,
            &self.config.weights,
        ))
    }
}
