//! Filtering and ordering shared by the store implementations.

use crate::adapter::HistoryQuery;
use munch_core::model::{Decision, GroupId};
use std::cmp::Reverse;

/// Apply a history query to an arbitrary set of decisions.
pub fn recent_completed<I>(decisions: I, query: &HistoryQuery) -> Vec<Decision>
where
    I: IntoIterator<Item = Decision>,
{
    let mut results: Vec<Decision> = decisions.into_iter().filter(|d| query.matches(d)).collect();
    results.sort_by_key(|d| {
        Reverse((
            d.result.as_ref().map(|r| r.selected_at),
            d.created_at,
        ))
    });
    if let Some(limit) = query.limit {
        results.truncate(limit);
    }
    results
}

/// Decisions belonging to `group_id`, newest first.
pub fn group_decisions<I>(decisions: I, group_id: &GroupId) -> Vec<Decision>
where
    I: IntoIterator<Item = Decision>,
{
    let mut results: Vec<Decision> = decisions
        .into_iter()
        .filter(|d| d.group_id.as_ref() == Some(group_id))
        .collect();
    results.sort_by_key(|d| Reverse(d.created_at));
    results
}
