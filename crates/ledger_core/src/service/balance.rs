//! Derived balances.
//!
//! # Responsibility
//! - Fold transactions and item adjustments into per-person and overall
//!   totals. Results are computed on demand and never stored.
//!
//! # Invariants
//! - `final_balance = borrowed - returned - given + items_to_me - items_by_me`.
//! - Positive final balance: the user owes the person. Negative: the person
//!   owes the user.

use crate::model::entry::{ItemAdjustment, ItemAdjustmentType, Transaction, TransactionType};
use crate::model::state::LedgerState;

/// Per-person totals. Every field except `final_balance` is a non-negative sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersonBalance {
    pub total_borrowed: f64,
    pub total_given: f64,
    pub total_returned: f64,
    pub total_items_given_by_me: f64,
    pub total_items_given_to_me: f64,
    pub final_balance: f64,
}

/// Ledger-wide totals across every person.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverallStats {
    pub total_borrowed: f64,
    pub total_given: f64,
    /// Items given by the user plus items given to the user.
    pub total_adjustments: f64,
    pub overall_balance: f64,
}

/// Which side of a balance the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    /// Positive balance.
    IOwe,
    /// Negative balance.
    OwedToMe,
    Balanced,
}

impl BalanceStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            Self::IOwe
        } else if balance < 0.0 {
            Self::OwedToMe
        } else {
            Self::Balanced
        }
    }
}

impl PersonBalance {
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.final_balance)
    }
}

impl OverallStats {
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.overall_balance)
    }
}

/// Computes the balance between the user and one person.
///
/// Unknown ids and people without entries yield an all-zero balance.
pub fn balance_for(state: &LedgerState, person_id: &str) -> PersonBalance {
    fold(
        state
            .transactions
            .iter()
            .filter(|transaction| transaction.person_id == person_id),
        state
            .item_adjustments
            .iter()
            .filter(|adjustment| adjustment.person_id == person_id),
    )
}

/// Computes ledger-wide totals with the same formula as [`balance_for`].
pub fn overall_stats(state: &LedgerState) -> OverallStats {
    let totals = fold(state.transactions.iter(), state.item_adjustments.iter());
    OverallStats {
        total_borrowed: totals.total_borrowed,
        total_given: totals.total_given,
        total_adjustments: totals.total_items_given_by_me + totals.total_items_given_to_me,
        overall_balance: totals.final_balance,
    }
}

fn fold<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    adjustments: impl Iterator<Item = &'a ItemAdjustment>,
) -> PersonBalance {
    let mut totals = PersonBalance::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionType::Borrowed => totals.total_borrowed += transaction.amount,
            TransactionType::Given => totals.total_given += transaction.amount,
            TransactionType::Returned => totals.total_returned += transaction.amount,
        }
    }
    for adjustment in adjustments {
        match adjustment.kind {
            ItemAdjustmentType::GivenByMe => totals.total_items_given_by_me += adjustment.amount,
            ItemAdjustmentType::GivenToMe => totals.total_items_given_to_me += adjustment.amount,
        }
    }

    totals.final_balance = totals.total_borrowed - totals.total_returned - totals.total_given
        + totals.total_items_given_to_me
        - totals.total_items_given_by_me;
    totals
}

#[cfg(test)]
mod tests {
    use super::BalanceStatus;

    #[test]
    fn status_follows_sign() {
        assert_eq!(BalanceStatus::from_balance(12.5), BalanceStatus::IOwe);
        assert_eq!(BalanceStatus::from_balance(-0.01), BalanceStatus::OwedToMe);
        assert_eq!(BalanceStatus::from_balance(0.0), BalanceStatus::Balanced);
    }
}
