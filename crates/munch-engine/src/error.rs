use munch_core::model::{CollectionId, DecisionMethod, GroupId, RestaurantId, UserId};
use munch_core::DecisionId;
use munch_store::StoreError;
use thiserror::Error;

/// Broad category of an [`EngineError`], for callers choosing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    /// Valid request at the wrong time or state; retrying will not help.
    Precondition,
    Authorization,
    /// Unexpected store fault, worth logging on the caller side.
    Store,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("collection not found: {0}")]
    CollectionNotFound(CollectionId),

    #[error("decision not found: {0}")]
    DecisionNotFound(String),

    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("collection {0} has no restaurants")]
    EmptyCollection(CollectionId),

    #[error("decision {0} is not active")]
    NotActive(DecisionId),

    #[error("decision {0} has no votes")]
    NoVotesSubmitted(DecisionId),

    #[error("decision {id} uses the {method} method, not tiered voting")]
    NotATieredDecision { id: DecisionId, method: DecisionMethod },

    #[error("decision {id} uses the {method} method, not a random draw")]
    NotARandomDecision { id: DecisionId, method: DecisionMethod },

    #[error("decision {0} is not a group decision")]
    NotAGroupDecision(DecisionId),

    #[error("{user} is not a participant in decision {id}")]
    NotAParticipant { id: DecisionId, user: UserId },

    #[error("{user} is not an admin of group {group}")]
    NotAdmin { group: GroupId, user: UserId },

    #[error("restaurant {restaurant} is not in collection {collection}")]
    RestaurantNotInCollection {
        collection: CollectionId,
        restaurant: RestaurantId,
    },

    #[error("decision {id} is open until {deadline}")]
    DeadlineNotReached {
        id: DecisionId,
        deadline: chrono::DateTime<chrono::Utc>,
    },

    #[error("visit date {visit_date} is in the future")]
    VisitInFuture {
        visit_date: chrono::DateTime<chrono::Utc>,
    },

    #[error("group decisions cannot use the {0} method")]
    UnsupportedMethod(DecisionMethod),

    #[error("a group decision needs at least one participant")]
    NoParticipants,

    #[error("deadline must be a positive number of hours, got {0}")]
    InvalidDeadline(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::CollectionNotFound(_) | Self::DecisionNotFound(_) | Self::GroupNotFound(_) => {
                ErrorClass::NotFound
            }
            Self::NotAParticipant { .. } | Self::NotAdmin { .. } => ErrorClass::Authorization,
            Self::Store(_) => ErrorClass::Store,
            _ => ErrorClass::Precondition,
        }
    }

    /// Map a failed conditional write on `id`.
    ///
    /// Losing a transition race reads exactly like finding the decision
    /// already closed or completed.
    pub(crate) fn from_transition(id: &DecisionId, err: StoreError) -> Self {
        match err {
            StoreError::PreconditionFailed(_) => Self::NotActive(id.clone()),
            StoreError::DecisionNotFound(_) => Self::DecisionNotFound(id.hex().to_string()),
            other => Self::Store(other),
        }
    }
}
