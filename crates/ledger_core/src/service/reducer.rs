//! Pure ledger transition function.
//!
//! # Responsibility
//! - Map `(state, command)` to the next state without touching the input.
//!
//! # Invariants
//! - Deleting a person removes exactly the entries whose `person_id` matches.
//! - Update/delete of an unknown id leaves the collection unchanged.
//! - Updates replace records by id; positions and other records are kept.
//! - Appends never reorder existing records.

use crate::model::entry::{EntryId, ItemAdjustment, Transaction};
use crate::model::person::{Person, PersonId};
use crate::model::state::{Language, LedgerState};

/// A mutation applied to the ledger.
///
/// Add commands carry fully materialized records; id and timestamp
/// generation happens before the command is built.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    AddPerson(Person),
    DeletePerson(PersonId),
    AddTransaction(Transaction),
    UpdateTransaction(Transaction),
    DeleteTransaction(EntryId),
    AddItemAdjustment(ItemAdjustment),
    UpdateItemAdjustment(ItemAdjustment),
    DeleteItemAdjustment(EntryId),
    SetLanguage(Language),
    ImportData(LedgerState),
}

impl LedgerCommand {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPerson(_) => "add_person",
            Self::DeletePerson(_) => "delete_person",
            Self::AddTransaction(_) => "add_transaction",
            Self::UpdateTransaction(_) => "update_transaction",
            Self::DeleteTransaction(_) => "delete_transaction",
            Self::AddItemAdjustment(_) => "add_item_adjustment",
            Self::UpdateItemAdjustment(_) => "update_item_adjustment",
            Self::DeleteItemAdjustment(_) => "delete_item_adjustment",
            Self::SetLanguage(_) => "set_language",
            Self::ImportData(_) => "import_data",
        }
    }
}

/// Produces the state that results from applying `command` to `state`.
pub fn reduce(state: &LedgerState, command: LedgerCommand) -> LedgerState {
    match command {
        LedgerCommand::AddPerson(person) => {
            let mut next = state.clone();
            next.persons.push(person);
            next
        }
        LedgerCommand::DeletePerson(id) => LedgerState {
            persons: retain(&state.persons, |person| person.id != id),
            transactions: retain(&state.transactions, |transaction| {
                transaction.person_id != id
            }),
            item_adjustments: retain(&state.item_adjustments, |adjustment| {
                adjustment.person_id != id
            }),
            language: state.language,
        },
        LedgerCommand::AddTransaction(transaction) => {
            let mut next = state.clone();
            next.transactions.push(transaction);
            next
        }
        LedgerCommand::UpdateTransaction(updated) => LedgerState {
            transactions: replace_by_id(&state.transactions, updated, |t| t.id.as_str()),
            ..state.clone()
        },
        LedgerCommand::DeleteTransaction(id) => LedgerState {
            transactions: retain(&state.transactions, |transaction| transaction.id != id),
            ..state.clone()
        },
        LedgerCommand::AddItemAdjustment(adjustment) => {
            let mut next = state.clone();
            next.item_adjustments.push(adjustment);
            next
        }
        LedgerCommand::UpdateItemAdjustment(updated) => LedgerState {
            item_adjustments: replace_by_id(&state.item_adjustments, updated, |a| a.id.as_str()),
            ..state.clone()
        },
        LedgerCommand::DeleteItemAdjustment(id) => LedgerState {
            item_adjustments: retain(&state.item_adjustments, |adjustment| adjustment.id != id),
            ..state.clone()
        },
        LedgerCommand::SetLanguage(language) => LedgerState {
            language,
            ..state.clone()
        },
        LedgerCommand::ImportData(imported) => imported,
    }
}

fn retain<T: Clone>(records: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    records.iter().filter(|&record| keep(record)).cloned().collect()
}

fn replace_by_id<T: Clone>(records: &[T], updated: T, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    records
        .iter()
        .map(|record| {
            if id_of(record) == id_of(&updated) {
                updated.clone()
            } else {
                record.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{reduce, LedgerCommand};
    use crate::model::person::Person;
    use crate::model::state::{Language, LedgerState};

    #[test]
    fn reduce_leaves_input_state_untouched() {
        let before = LedgerState::default();
        let after = reduce(&before, LedgerCommand::AddPerson(Person::new("Asad")));

        assert!(before.persons.is_empty());
        assert_eq!(after.persons.len(), 1);
        assert_eq!(after.persons[0].name, "Asad");
    }

    #[test]
    fn set_language_changes_only_the_tag() {
        let before = reduce(
            &LedgerState::default(),
            LedgerCommand::AddPerson(Person::new("Bilal")),
        );
        let after = reduce(&before, LedgerCommand::SetLanguage(Language::Ur));

        assert_eq!(after.language, Language::Ur);
        assert_eq!(after.persons, before.persons);
    }

    #[test]
    fn command_names_are_snake_case() {
        let command = LedgerCommand::DeleteTransaction("t1".to_string());
        assert_eq!(command.name(), "delete_transaction");
    }
}
