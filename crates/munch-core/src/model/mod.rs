pub mod collection;
pub mod decision;
pub mod group;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use collection::{normalize_refs, Collection, Restaurant, RestaurantRef};
pub use decision::{
    Ballot, Decision, DecisionDraft, DecisionKind, DecisionMethod, DecisionResult,
    DecisionStatus,
};
pub use group::Group;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// A user-curated restaurant collection.
    CollectionId
);
string_id!(GroupId);
string_id!(RestaurantId);
string_id!(
    /// Caller identity as supplied by the API layer.
    UserId
);
