//! Points-based ranked-choice scoring.
//!
//! Position `i` (0-based) on a ballot earns `max(0, 3 - i)` points: three
//! for a first choice, two for second, one for third, nothing beyond.

use crate::model::{Ballot, RestaurantId};
use std::collections::{BTreeMap, HashSet};

pub const FIRST_CHOICE_POINTS: u32 = 3;

pub fn points_for_rank(rank: usize) -> u32 {
    FIRST_CHOICE_POINTS.saturating_sub(rank.min(u32::MAX as usize) as u32)
}

/// Summed points across ballots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tally {
    pub scores: BTreeMap<RestaurantId, u32>,
    /// Candidate order the scores were computed against, used to keep the
    /// leader list stable.
    order: Vec<RestaurantId>,
    pub counted_ballots: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TallyOutcome {
    Winner { restaurant: RestaurantId, points: u32 },
    Tie { restaurants: Vec<RestaurantId>, points: u32 },
}

/// Score `ballots` against the candidate list.
///
/// Ids that are not candidates are skipped without shifting the points of
/// the entries after them. A restaurant listed twice on one ballot only
/// scores at its first position. Ballots with no candidate at all are not
/// counted.
pub fn score_ballots(ballots: &[Ballot], candidates: &[RestaurantId]) -> Tally {
    let eligible: HashSet<&RestaurantId> = candidates.iter().collect();
    let mut scores: BTreeMap<RestaurantId, u32> = BTreeMap::new();
    let mut counted_ballots = 0;

    for ballot in ballots {
        let mut seen = HashSet::new();
        let mut counted = false;
        for (rank, id) in ballot.ranked_restaurant_ids.iter().enumerate() {
            if !eligible.contains(id) || !seen.insert(id) {
                continue;
            }
            counted = true;
            *scores.entry(id.clone()).or_insert(0) += points_for_rank(rank);
        }
        if counted {
            counted_ballots += 1;
        }
    }

    Tally {
        scores,
        order: candidates.to_vec(),
        counted_ballots,
    }
}

impl Tally {
    pub fn points(&self, restaurant: &RestaurantId) -> u32 {
        self.scores.get(restaurant).copied().unwrap_or(0)
    }

    /// Restaurants sharing the top score, in candidate order.
    pub fn leaders(&self) -> Vec<RestaurantId> {
        let Some(top) = self.scores.values().copied().max() else {
            return Vec::new();
        };
        self.order
            .iter()
            .filter(|r| self.scores.get(*r) == Some(&top))
            .cloned()
            .collect()
    }

    /// `None` when no ballot ranked a single candidate.
    pub fn outcome(&self) -> Option<TallyOutcome> {
        let leaders = self.leaders();
        let points = self.points(leaders.first()?);
        if leaders.len() == 1 {
            let restaurant = leaders.into_iter().next()?;
            Some(TallyOutcome::Winner { restaurant, points })
        } else {
            Some(TallyOutcome::Tie {
                restaurants: leaders,
                points,
            })
        }
    }

    /// "A=6, B=3, C=3" in descending score, candidate order within a score.
    pub fn summary(&self) -> String {
        let mut ranked: Vec<(&RestaurantId, u32)> = self
            .order
            .iter()
            .filter_map(|r| self.scores.get(r).map(|p| (r, *p)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .iter()
            .map(|(r, p)| format!("{}={}", r, p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
