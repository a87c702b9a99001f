//! Money transactions and item adjustments.
//!
//! # Responsibility
//! - Define the two kinds of ledger entries recorded against a person.
//! - Provide stable wire tags for entry kinds (`borrowed`, `given_by_me`, ...).
//!
//! # Invariants
//! - `amount` is a positive currency-equivalent value; callers validate it
//!   before an entry reaches the store.
//! - `description` is free text where the empty string means "none".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::person::PersonId;

/// Identifier of a transaction or item adjustment.
pub type EntryId = String;

/// Direction of a money transaction, seen from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// The user took money from the person.
    Borrowed,
    /// The user gave money to the person.
    Given,
    /// The user paid back an earlier borrowing.
    Returned,
}

/// Direction of a non-cash exchange, seen from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAdjustmentType {
    /// The user handed an item to the person.
    GivenByMe,
    /// The person handed an item to the user.
    GivenToMe,
}

/// Unknown entry kind tag encountered while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTagError {
    pub kind: &'static str,
    pub tag: String,
}

impl Display for UnknownTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} tag `{}`", self.kind, self.tag)
    }
}

impl Error for UnknownTagError {}

impl TransactionType {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Borrowed => "borrowed",
            Self::Given => "given",
            Self::Returned => "returned",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "borrowed" => Ok(Self::Borrowed),
            "given" => Ok(Self::Given),
            "returned" => Ok(Self::Returned),
            other => Err(UnknownTagError {
                kind: "transaction type",
                tag: other.to_string(),
            }),
        }
    }
}

impl ItemAdjustmentType {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::GivenByMe => "given_by_me",
            Self::GivenToMe => "given_to_me",
        }
    }
}

impl FromStr for ItemAdjustmentType {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "given_by_me" => Ok(Self::GivenByMe),
            "given_to_me" => Ok(Self::GivenToMe),
            other => Err(UnknownTagError {
                kind: "item adjustment type",
                tag: other.to_string(),
            }),
        }
    }
}

/// A money movement between the user and one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: EntryId,
    pub person_id: PersonId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    /// Caller-supplied `YYYY-MM-DD`.
    pub date: String,
    /// Caller-supplied `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
}

/// A non-cash exchange valued in currency-equivalent terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAdjustment {
    pub id: EntryId,
    pub person_id: PersonId,
    pub item_name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: ItemAdjustmentType,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
}

/// Caller-supplied fields of a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub person_id: PersonId,
    pub kind: TransactionType,
    pub amount: f64,
    pub date: String,
    pub time: String,
    pub description: String,
}

/// Caller-supplied fields of a new item adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAdjustmentDraft {
    pub person_id: PersonId,
    pub item_name: String,
    pub kind: ItemAdjustmentType,
    pub amount: f64,
    pub date: String,
    pub time: String,
    pub description: String,
}

impl Transaction {
    /// Materializes a draft with a generated id and the current timestamp.
    pub fn from_draft(draft: TransactionDraft) -> Self {
        Self {
            id: super::generate_id(),
            person_id: draft.person_id,
            kind: draft.kind,
            amount: draft.amount,
            date: draft.date,
            time: draft.time,
            description: draft.description,
            created_at: super::timestamp_now(),
        }
    }
}

impl ItemAdjustment {
    /// Materializes a draft with a generated id and the current timestamp.
    pub fn from_draft(draft: ItemAdjustmentDraft) -> Self {
        Self {
            id: super::generate_id(),
            person_id: draft.person_id,
            item_name: draft.item_name,
            amount: draft.amount,
            kind: draft.kind,
            date: draft.date,
            time: draft.time,
            description: draft.description,
            created_at: super::timestamp_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemAdjustmentType, Transaction, TransactionType};

    #[test]
    fn type_tags_parse_back() {
        for kind in [
            TransactionType::Borrowed,
            TransactionType::Given,
            TransactionType::Returned,
        ] {
            assert_eq!(kind.as_tag().parse::<TransactionType>().unwrap(), kind);
        }
        assert_eq!(
            "given_to_me".parse::<ItemAdjustmentType>().unwrap(),
            ItemAdjustmentType::GivenToMe
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "lent".parse::<TransactionType>().unwrap_err();
        assert_eq!(err.tag, "lent");
        assert!(err.to_string().contains("transaction type"));
    }

    #[test]
    fn transaction_serializes_with_external_field_names() {
        let transaction = Transaction {
            id: "t1".to_string(),
            person_id: "p1".to_string(),
            kind: TransactionType::Returned,
            amount: 200.0,
            date: "2024-03-01".to_string(),
            time: "10:30".to_string(),
            description: String::new(),
            created_at: "2024-03-01T10:30:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["personId"], "p1");
        assert_eq!(json["type"], "returned");
        assert_eq!(json["createdAt"], "2024-03-01T10:30:00.000Z");
    }
}
