use super::{CollectionId, GroupId, RestaurantId, UserId};
use crate::hash::DecisionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Personal,
    Group,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Personal => "personal",
            Self::Group => "group",
        })
    }
}

/// How a decision gets resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMethod {
    /// Weighted lottery.
    Random,
    /// Ranked-choice group vote.
    Tiered,
    /// A past visit entered after the fact.
    Manual,
}

impl DecisionMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Some(Self::Random),
            "tiered" => Some(Self::Tiered),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for DecisionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::Tiered => "tiered",
            Self::Manual => "manual",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Active,
    Completed,
    Expired,
}

impl DecisionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Expired => "expired",
        })
    }
}

/// One user's ranking against a group decision, best first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ballot {
    pub user_id: UserId,
    pub ranked_restaurant_ids: Vec<RestaurantId>,
    pub submitted_at: DateTime<Utc>,
}

/// The outcome stored on a completed decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionResult {
    pub restaurant_id: RestaurantId,
    pub selected_at: DateTime<Utc>,
    pub reasoning: String,
    /// Weights the draw used: every restaurant for the lottery, only the
    /// tied ones for a tie-broken tally, empty otherwise.
    #[serde(default)]
    pub weights: BTreeMap<RestaurantId, f64>,
    /// Point totals per restaurant for a tallied vote.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tally: BTreeMap<RestaurantId, u32>,
}

/// Everything a store needs to create a decision.
///
/// A draft that already carries a `resolution` is born completed, so a
/// lottery result is never observable in the active state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionDraft {
    pub kind: DecisionKind,
    pub collection_id: CollectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub participants: Vec<UserId>,
    pub method: DecisionMethod,
    pub deadline: DateTime<Utc>,
    pub visit_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<DecisionResult>,
}

impl DecisionDraft {
    pub fn into_decision(self, id: DecisionId) -> Decision {
        let status = if self.resolution.is_some() {
            DecisionStatus::Completed
        } else {
            DecisionStatus::Active
        };
        let updated_at = self
            .resolution
            .as_ref()
            .map(|r| r.selected_at.max(self.created_at))
            .unwrap_or(self.created_at);
        Decision {
            id,
            kind: self.kind,
            collection_id: self.collection_id,
            group_id: self.group_id,
            participants: self.participants,
            method: self.method,
            status,
            deadline: self.deadline,
            visit_date: self.visit_date,
            result: self.resolution,
            ballots: Vec::new(),
            created_at: self.created_at,
            updated_at,
        }
    }
}

/// The unit of resolution, personal or group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub id: DecisionId,
    pub kind: DecisionKind,
    pub collection_id: CollectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub participants: Vec<UserId>,
    pub method: DecisionMethod,
    pub status: DecisionStatus,
    pub deadline: DateTime<Utc>,
    pub visit_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DecisionResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ballots: Vec<Ballot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Decision {
    /// Status with lazy expiry applied: an active decision past its
    /// deadline reads as expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> DecisionStatus {
        match self.status {
            DecisionStatus::Active if self.deadline < now => DecisionStatus::Expired,
            other => other,
        }
    }

    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.iter().any(|p| p == user)
    }

    pub fn ballot_for(&self, user: &UserId) -> Option<&Ballot> {
        self.ballots.iter().find(|b| &b.user_id == user)
    }

    /// Replace the caller's ballot, or append it if this is their first.
    pub fn upsert_ballot(&mut self, ballot: Ballot) {
        self.updated_at = self.updated_at.max(ballot.submitted_at);
        match self.ballots.iter_mut().find(|b| b.user_id == ballot.user_id) {
            Some(existing) => *existing = ballot,
            None => self.ballots.push(ballot),
        }
    }

    /// The restaurant this decision settled on, if completed.
    pub fn selected_restaurant(&self) -> Option<&RestaurantId> {
        self.result.as_ref().map(|r| &r.restaurant_id)
    }

    /// Data-model invariants, as a list of human-readable violations.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.result.is_some() != (self.status == DecisionStatus::Completed) {
            out.push(format!(
                "result presence does not match status {}",
                self.status
            ));
        }
        if self.participants.is_empty() {
            out.push("participants is empty".into());
        }
        if (self.kind == DecisionKind::Group) != self.group_id.is_some() {
            out.push("group_id presence does not match kind".into());
        }
        for ballot in &self.ballots {
            if !self.is_participant(&ballot.user_id) {
                out.push(format!("ballot from non-participant {}", ballot.user_id));
            }
        }
        if self.deadline < self.created_at {
            out.push("deadline precedes created_at".into());
        }
        out
    }
}
