//! Core ledger logic for tracking informal debts with known people.
//! This crate is the single source of truth for ledger invariants.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::{
    deserialize, detect_format, export_file_name, serialize, CodecError, CodecResult, DataFormat,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{
    EntryId, ItemAdjustment, ItemAdjustmentDraft, ItemAdjustmentType, Transaction,
    TransactionDraft, TransactionType, UnknownTagError,
};
pub use model::person::{Person, PersonId};
pub use model::state::{Language, LedgerState};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::activity::{person_activity, ActivityEntry};
pub use service::balance::{balance_for, overall_stats, BalanceStatus, OverallStats, PersonBalance};
pub use service::ledger_store::{LedgerStore, StoreError, StoreResult, LEDGER_SLOT_KEY};
pub use service::reducer::{reduce, LedgerCommand};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
