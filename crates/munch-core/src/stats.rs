use crate::config::WeightPolicy;
use crate::model::{CollectionId, Decision, RestaurantId};
use crate::weight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantStatistics {
    pub selection_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_selected: Option<DateTime<Utc>>,
    pub current_weight: f64,
}

/// Selection history summary for one collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionStatistics {
    pub collection_id: CollectionId,
    pub total_decisions: usize,
    pub per_restaurant: BTreeMap<RestaurantId, RestaurantStatistics>,
}

/// Build statistics from the collection's completed decisions.
///
/// Counts and last-selected dates come from `completed`; current weights
/// come from `weight_history`, the same history the lottery would use.
pub fn collection_statistics(
    collection_id: &CollectionId,
    restaurants: &[RestaurantId],
    completed: &[Decision],
    weight_history: &[Decision],
    now: DateTime<Utc>,
    policy: &WeightPolicy,
) -> CollectionStatistics {
    let per_restaurant = restaurants
        .iter()
        .map(|r| {
            let last_selected = completed
                .iter()
                .filter_map(|d| d.result.as_ref())
                .filter(|res| &res.restaurant_id == r)
                .map(|res| res.selected_at)
                .max();
            let stats = RestaurantStatistics {
                selection_count: weight::selection_count(r, completed),
                last_selected,
                current_weight: weight::weight(r, weight_history, now, policy),
            };
            (r.clone(), stats)
        })
        .collect();

    CollectionStatistics {
        collection_id: collection_id.clone(),
        total_decisions: completed.len(),
        per_restaurant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::DecisionId;
    use crate::model::{DecisionDraft, DecisionKind, DecisionMethod, DecisionResult};
    use chrono::{Duration, TimeZone};

    fn completed(restaurant: &str, selected_at: DateTime<Utc>) -> Decision {
        DecisionDraft {
            kind: DecisionKind::Personal,
            collection_id: "favs".into(),
            group_id: None,
            participants: vec!["ana".into()],
            method: DecisionMethod::Random,
            deadline: selected_at,
            visit_date: selected_at,
            created_at: selected_at,
            resolution: Some(DecisionResult {
                restaurant_id: restaurant.into(),
                selected_at,
                reasoning: String::new(),
                weights: BTreeMap::new(),
                tally: BTreeMap::new(),
            }),
        }
        .into_decision(DecisionId::hash(
            format!("{restaurant}{selected_at}").as_bytes(),
        ))
    }

    #[test]
    fn counts_and_weights() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let history = vec![
            completed("a", now - Duration::days(5)),
            completed("a", now - Duration::days(40)),
        ];
        let stats = collection_statistics(
            &"favs".into(),
            &["a".into(), "b".into()],
            &history,
            &history,
            now,
            &WeightPolicy::default(),
        );
        assert_eq!(stats.total_decisions, 2);
        let a = &stats.per_restaurant[&RestaurantId::from("a")];
        assert_eq!(a.selection_count, 2);
        assert_eq!(a.last_selected, Some(now - Duration::days(5)));
        assert!((a.current_weight - 0.25).abs() < 1e-12);
        let b = &stats.per_restaurant[&RestaurantId::from("b")];
        assert_eq!(b.selection_count, 0);
        assert_eq!(b.last_selected, None);
        assert_eq!(b.current_weight, 1.0);
    }
}
