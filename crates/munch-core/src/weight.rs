//! Time-decayed fairness weights.
//!
//! A restaurant picked recently gets a reduced chance of being picked
//! again. The penalty starts at `floor_fraction` of the base weight on the
//! day of the pick and recovers linearly to the full weight at the end of
//! the recency window. Only the most recent pick counts.

use crate::config::WeightPolicy;
use crate::model::{Decision, RestaurantId};
use chrono::{DateTime, Duration, Utc};

/// Most recent selection of `restaurant` within the recency window.
pub fn last_recent_selection(
    restaurant: &RestaurantId,
    history: &[Decision],
    now: DateTime<Utc>,
    policy: &WeightPolicy,
) -> Option<DateTime<Utc>> {
    // A window too large to represent is treated as no penalty at all.
    let window = Duration::try_days(policy.recency_window_days)?;
    history
        .iter()
        .filter_map(|d| d.result.as_ref())
        .filter(|r| &r.restaurant_id == restaurant)
        .map(|r| r.selected_at)
        .filter(|selected_at| now - *selected_at <= window)
        .max()
}

/// Fairness weight in `[floor_fraction * base, base]`.
///
/// `history` may contain decisions for other restaurants; they are ignored.
pub fn weight(
    restaurant: &RestaurantId,
    history: &[Decision],
    now: DateTime<Utc>,
    policy: &WeightPolicy,
) -> f64 {
    let base = policy.base_weight;
    let Some(selected_at) = last_recent_selection(restaurant, history, now, policy) else {
        return base;
    };

    // Whole days, a future-dated pick counts as today.
    let days_since = (now - selected_at).num_days().max(0);
    let window = policy.recency_window_days.max(1) as f64;
    let multiplier = (days_since as f64 / window).min(1.0);
    base * (policy.floor_fraction + (1.0 - policy.floor_fraction) * multiplier)
}

/// How many times `restaurant` appears as a result in `history`.
pub fn selection_count(restaurant: &RestaurantId, history: &[Decision]) -> usize {
    history
        .iter()
        .filter(|d| d.selected_restaurant() == Some(restaurant))
        .count()
}

/// Weights for every candidate, in candidate order.
pub fn weigh_all(
    candidates: &[RestaurantId],
    history: &[Decision],
    now: DateTime<Utc>,
    policy: &WeightPolicy,
) -> Vec<(RestaurantId, f64)> {
    candidates
        .iter()
        .map(|r| (r.clone(), weight(r, history, now, policy)))
        .collect()
}
