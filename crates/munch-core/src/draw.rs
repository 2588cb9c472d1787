//! Weighted random selection.

/// Pick one item with probability proportional to its weight.
///
/// `unit` must be uniform over `[0, 1)`; it is scaled by the total weight
/// and the items are walked in order, subtracting each weight until the
/// remainder reaches zero. Floating-point drift that leaves a positive
/// remainder after the walk selects the last item. Returns `None` only for
/// an empty slice.
pub fn weighted_pick<T>(items: &[(T, f64)], unit: f64) -> Option<&T> {
    let (last, _) = items.last()?;
    let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    let mut remainder = unit.clamp(0.0, 1.0) * total;
    for (item, w) in items {
        remainder -= w.max(0.0);
        if remainder <= 0.0 {
            return Some(item);
        }
    }
    Some(last)
}

/// Sum of the non-negative weights.
pub fn total_weight<T>(items: &[(T, f64)]) -> f64 {
    items.iter().map(|(_, w)| w.max(0.0)).sum()
}
