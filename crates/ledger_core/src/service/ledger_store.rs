//! Ledger store: the single owner of the ledger state.
//!
//! # Responsibility
//! - Load the persisted snapshot on open, falling back to an empty ledger.
//! - Apply commands through the pure reducer and persist every result.
//! - Expose derived balances and import/export entry points to hosts.
//!
//! # Invariants
//! - The held state is replaced only after the new snapshot is written.
//! - A failed import leaves the held and persisted state untouched.
//! - Caller-side preconditions (non-empty names, `amount > 0`) are not
//!   re-validated here.

use crate::codec::{self, CodecError, DataFormat};
use crate::model::entry::{
    EntryId, ItemAdjustment, ItemAdjustmentDraft, Transaction, TransactionDraft,
};
use crate::model::person::{Person, PersonId};
use crate::model::state::{Language, LedgerState};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use crate::service::activity::{person_activity, ActivityEntry};
use crate::service::balance::{balance_for, overall_stats, OverallStats, PersonBalance};
use crate::service::reducer::{reduce, LedgerCommand};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the durable slot holding the ledger snapshot.
pub const LEDGER_SLOT_KEY: &str = "ledger_data";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store commands.
#[derive(Debug)]
pub enum StoreError {
    /// Durable slot write failed; the held state was not changed.
    Repo(RepoError),
    /// Imported text was rejected; the held state was not changed.
    Import(CodecError),
    /// The state could not be encoded for persistence or export.
    Encode(CodecError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "ledger persistence failed: {err}"),
            Self::Import(err) => write!(f, "ledger import failed: {err}"),
            Self::Encode(err) => write!(f, "ledger encoding failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Import(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Owns the current `LedgerState` and its durable slot.
pub struct LedgerStore<R: SlotRepository> {
    repo: R,
    state: LedgerState,
}

impl<R: SlotRepository> LedgerStore<R> {
    /// Opens the store, restoring the last persisted snapshot.
    ///
    /// A missing, unreadable or corrupt snapshot yields the empty ledger; the
    /// condition is logged and never returned as an error.
    pub fn open(repo: R) -> Self {
        let state = load_state(&repo);
        Self { repo, state }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn language(&self) -> Language {
        self.state.language
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.state.person(id)
    }

    /// Applies `command`, persists the result and makes it current.
    pub fn dispatch(&mut self, command: LedgerCommand) -> StoreResult<()> {
        let name = command.name();
        let next = reduce(&self.state, command);
        if let Err(err) = self.persist(&next) {
            error!("event=ledger_dispatch module=store status=error command={name} error={err}");
            return Err(err);
        }
        info!(
            "event=ledger_dispatch module=store status=ok command={name} persons={} transactions={} item_adjustments={}",
            next.persons.len(),
            next.transactions.len(),
            next.item_adjustments.len()
        );
        self.state = next;
        Ok(())
    }

    /// Adds a person and returns the generated id.
    pub fn add_person(&mut self, name: impl Into<String>) -> StoreResult<PersonId> {
        let person = Person::new(name);
        let id = person.id.clone();
        self.dispatch(LedgerCommand::AddPerson(person))?;
        Ok(id)
    }

    /// Removes a person together with all of their entries.
    pub fn delete_person(&mut self, id: &str) -> StoreResult<()> {
        self.dispatch(LedgerCommand::DeletePerson(id.to_string()))
    }

    pub fn add_transaction(&mut self, draft: TransactionDraft) -> StoreResult<EntryId> {
        let transaction = Transaction::from_draft(draft);
        let id = transaction.id.clone();
        self.dispatch(LedgerCommand::AddTransaction(transaction))?;
        Ok(id)
    }

    /// Replaces the transaction with the same id; unknown ids change nothing.
    pub fn update_transaction(&mut self, transaction: Transaction) -> StoreResult<()> {
        self.dispatch(LedgerCommand::UpdateTransaction(transaction))
    }

    pub fn delete_transaction(&mut self, id: &str) -> StoreResult<()> {
        self.dispatch(LedgerCommand::DeleteTransaction(id.to_string()))
    }

    pub fn add_item_adjustment(&mut self, draft: ItemAdjustmentDraft) -> StoreResult<EntryId> {
        let adjustment = ItemAdjustment::from_draft(draft);
        let id = adjustment.id.clone();
        self.dispatch(LedgerCommand::AddItemAdjustment(adjustment))?;
        Ok(id)
    }

    /// Replaces the adjustment with the same id; unknown ids change nothing.
    pub fn update_item_adjustment(&mut self, adjustment: ItemAdjustment) -> StoreResult<()> {
        self.dispatch(LedgerCommand::UpdateItemAdjustment(adjustment))
    }

    pub fn delete_item_adjustment(&mut self, id: &str) -> StoreResult<()> {
        self.dispatch(LedgerCommand::DeleteItemAdjustment(id.to_string()))
    }

    pub fn set_language(&mut self, language: Language) -> StoreResult<()> {
        self.dispatch(LedgerCommand::SetLanguage(language))
    }

    /// Replaces the whole ledger with decoded `text`.
    ///
    /// Row-format text carries no locale, so the current language is kept;
    /// a JSON snapshot replaces the language as well.
    pub fn import_data(&mut self, text: &str) -> StoreResult<()> {
        let format = codec::detect_format(text);
        let mut imported = codec::deserialize(text).map_err(|err| {
            warn!(
                "event=ledger_import module=store status=error format={} {}",
                format.as_str(),
                err.log_fields()
            );
            StoreError::Import(err)
        })?;
        if format == DataFormat::Rows {
            imported.language = self.state.language;
        }
        self.dispatch(LedgerCommand::ImportData(imported))
    }

    /// Encodes the current ledger in the canonical export format.
    pub fn export_data(&self) -> StoreResult<String> {
        codec::serialize(&self.state).map_err(StoreError::Encode)
    }

    pub fn balance_for(&self, person_id: &str) -> PersonBalance {
        balance_for(&self.state, person_id)
    }

    pub fn overall_stats(&self) -> OverallStats {
        overall_stats(&self.state)
    }

    pub fn person_activity(&self, person_id: &str) -> Vec<ActivityEntry<'_>> {
        person_activity(&self.state, person_id)
    }

    /// Releases the store, handing back its repository.
    pub fn into_repo(self) -> R {
        self.repo
    }

    fn persist(&self, state: &LedgerState) -> StoreResult<()> {
        let snapshot = codec::snapshot::encode(state).map_err(StoreError::Encode)?;
        self.repo.write_slot(LEDGER_SLOT_KEY, &snapshot)?;
        Ok(())
    }
}

fn load_state(repo: &impl SlotRepository) -> LedgerState {
    let raw = match repo.read_slot(LEDGER_SLOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=ledger_load module=store status=ok source=empty");
            return LedgerState::default();
        }
        Err(err) => {
            warn!(
                "event=ledger_load module=store status=fallback error_code=slot_read_failed error={err}"
            );
            return LedgerState::default();
        }
    };

    match codec::snapshot::decode(&raw) {
        Ok(state) => {
            info!(
                "event=ledger_load module=store status=ok source=slot persons={} transactions={} item_adjustments={}",
                state.persons.len(),
                state.transactions.len(),
                state.item_adjustments.len()
            );
            state
        }
        Err(err) => {
            warn!(
                "event=ledger_load module=store status=fallback reason=snapshot_corrupt {}",
                err.log_fields()
            );
            LedgerState::default()
        }
    }
}
