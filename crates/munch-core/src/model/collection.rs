use super::{CollectionId, RestaurantId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A restaurant known to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Identifier in the upstream places provider, when imported from one.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "externalId")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
}

/// How a collection refers to one of its restaurants.
///
/// Older records hold a bare id, some hold both ids, and imports may hold
/// only the provider id. Variant order matters for untagged decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RestaurantRef {
    Linked {
        id: RestaurantId,
        #[serde(alias = "externalId")]
        external_id: String,
    },
    External {
        #[serde(alias = "externalId")]
        external_id: String,
    },
    Plain(RestaurantId),
}

/// A named, curated set of restaurants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
    #[serde(default)]
    pub restaurants: Vec<RestaurantRef>,
    pub created_at: DateTime<Utc>,
}

/// Reduce mixed-format references to plain restaurant ids, in collection
/// order, without duplicates.
///
/// External-only references go through `resolve_external`; the ones it
/// cannot resolve are dropped.
pub fn normalize_refs<F>(refs: &[RestaurantRef], resolve_external: F) -> Vec<RestaurantId>
where
    F: Fn(&str) -> Option<RestaurantId>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(refs.len());
    for r in refs {
        let id = match r {
            RestaurantRef::Plain(id) | RestaurantRef::Linked { id, .. } => Some(id.clone()),
            RestaurantRef::External { external_id } => {
                let resolved = resolve_external(external_id);
                if resolved.is_none() {
                    tracing::warn!(
                        external_id = %external_id,
                        "dropping unresolvable restaurant reference"
                    );
                }
                resolved
            }
        };
        if let Some(id) = id {
            if seen.insert(id.clone()) {
                out.push(id);
            }
        }
    }
    out
}
