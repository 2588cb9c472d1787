use super::{GroupId, UserId};
use serde::{Deserialize, Serialize};

/// A group of users deciding together. Only `admins` may close decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub admins: Vec<UserId>,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl Group {
    pub fn is_admin(&self, user: &UserId) -> bool {
        self.admins.iter().any(|a| a == user)
    }
}
