//! Decision identifiers.
//!
//! A decision id is minted once, when the draft is first stored, from the
//! draft's canonical bytes and a random salt. It never changes afterwards:
//! ballots and status transitions rewrite the record under the same id.
//! Users refer to decisions by the 8-char short form or any unique prefix
//! of at least [`MIN_PREFIX_LEN`] hex chars.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub const MIN_PREFIX_LEN: usize = 4;
const SHORT_LEN: usize = 8;
const HEX_LEN: usize = 64;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct DecisionId(String);

impl DecisionId {
    /// Mint an id from a draft's canonical bytes and a salt.
    pub fn derive(canonical: &[u8], salt: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical);
        hasher.update([0]);
        hasher.update(salt.to_be_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Id from the digest of arbitrary bytes; fixtures use this for stable ids.
    pub fn hash(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Parse a full 64-char id, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        if s.len() != HEX_LEN || !is_hex(s) {
            return Err(CoreError::InvalidDecisionId(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Lowercased prefix if it can select decisions, `None` if it is too
    /// short or not hex.
    pub fn normalize_prefix(prefix: &str) -> Option<String> {
        let prefix = prefix.trim();
        (prefix.len() >= MIN_PREFIX_LEN && prefix.len() <= HEX_LEN && is_hex(prefix))
            .then(|| prefix.to_ascii_lowercase())
    }

    pub fn hex(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }

    /// Storage location: a 2-char directory and the remaining 62 chars.
    pub fn fan_out(&self) -> (&str, &str) {
        self.0.split_at(2)
    }

    /// Whether this id begins with an already normalized prefix.
    pub fn matches_prefix(&self, normalized: &str) -> bool {
        self.0.starts_with(normalized)
    }
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

impl FromStr for DecisionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DecisionId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DecisionId> for String {
    fn from(id: DecisionId) -> Self {
        id.0
    }
}

impl fmt::Debug for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecisionId({})", self.short())
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}
