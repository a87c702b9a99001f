//! Person record.

use serde::{Deserialize, Serialize};

/// Identifier of a person, unique within `LedgerState::persons`.
pub type PersonId = String;

/// Someone the user exchanges money or items with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// RFC 3339 timestamp of creation.
    pub created_at: String,
}

impl Person {
    /// Creates a person with a generated id and the current timestamp.
    ///
    /// The caller is responsible for rejecting empty names.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: super::generate_id(),
            name: name.into(),
            created_at: super::timestamp_now(),
        }
    }
}
