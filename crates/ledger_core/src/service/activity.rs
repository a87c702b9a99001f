//! Per-person activity timeline for display.
//!
//! The store keeps entries in insertion order; this view merges one
//! person's transactions and adjustments newest first.

use crate::model::entry::{ItemAdjustment, Transaction};
use crate::model::state::LedgerState;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// One row of a person's activity timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityEntry<'a> {
    Transaction(&'a Transaction),
    ItemAdjustment(&'a ItemAdjustment),
}

impl<'a> ActivityEntry<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Transaction(transaction) => &transaction.id,
            Self::ItemAdjustment(adjustment) => &adjustment.id,
        }
    }

    pub fn created_at(&self) -> &'a str {
        match self {
            Self::Transaction(transaction) => &transaction.created_at,
            Self::ItemAdjustment(adjustment) => &adjustment.created_at,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Self::Transaction(transaction) => transaction.amount,
            Self::ItemAdjustment(adjustment) => adjustment.amount,
        }
    }
}

/// Returns one person's entries sorted by `created_at` descending.
///
/// Equal timestamps keep collection order, transactions first.
pub fn person_activity<'a>(state: &'a LedgerState, person_id: &str) -> Vec<ActivityEntry<'a>> {
    let mut entries = state
        .transactions
        .iter()
        .filter(|transaction| transaction.person_id == person_id)
        .map(ActivityEntry::Transaction)
        .chain(
            state
                .item_adjustments
                .iter()
                .filter(|adjustment| adjustment.person_id == person_id)
                .map(ActivityEntry::ItemAdjustment),
        )
        .collect::<Vec<_>>();

    entries.sort_by(|left, right| compare_created_at(right.created_at(), left.created_at()));
    entries
}

// Unparseable timestamps compare as older than any parseable one.
fn compare_created_at(left: &str, right: &str) -> Ordering {
    match (parse_timestamp(left), parse_timestamp(right)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => left.cmp(right),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

#[cfg(test)]
mod tests {
    use super::{person_activity, ActivityEntry};
    use crate::model::entry::{ItemAdjustment, ItemAdjustmentType, Transaction, TransactionType};
    use crate::model::state::LedgerState;

    fn transaction(id: &str, person_id: &str, created_at: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            person_id: person_id.to_string(),
            kind: TransactionType::Given,
            amount: 10.0,
            date: "2024-01-01".to_string(),
            time: "09:00".to_string(),
            description: String::new(),
            created_at: created_at.to_string(),
        }
    }

    fn adjustment(id: &str, person_id: &str, created_at: &str) -> ItemAdjustment {
        ItemAdjustment {
            id: id.to_string(),
            person_id: person_id.to_string(),
            item_name: "rice".to_string(),
            amount: 40.0,
            kind: ItemAdjustmentType::GivenToMe,
            date: "2024-01-01".to_string(),
            time: "09:00".to_string(),
            description: String::new(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn merges_and_sorts_newest_first() {
        let state = LedgerState {
            transactions: vec![
                transaction("t-old", "p1", "2024-01-01T08:00:00.000Z"),
                transaction("t-other", "p2", "2024-06-01T08:00:00.000Z"),
                transaction("t-new", "p1", "2024-03-01T08:00:00.000Z"),
            ],
            item_adjustments: vec![adjustment("a-mid", "p1", "2024-02-01T08:00:00.000Z")],
            ..LedgerState::default()
        };

        let ids = person_activity(&state, "p1")
            .iter()
            .map(ActivityEntry::id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["t-new", "a-mid", "t-old"]);
    }

    #[test]
    fn equal_timestamps_keep_collection_order() {
        let stamp = "2024-01-01T08:00:00.000Z";
        let state = LedgerState {
            transactions: vec![transaction("t1", "p1", stamp), transaction("t2", "p1", stamp)],
            item_adjustments: vec![adjustment("a1", "p1", stamp)],
            ..LedgerState::default()
        };

        let ids = person_activity(&state, "p1")
            .iter()
            .map(ActivityEntry::id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["t1", "t2", "a1"]);
    }
}
