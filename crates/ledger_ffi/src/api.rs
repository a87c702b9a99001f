//! FFI use-case API for the Flutter ledger shell.
//!
//! # Responsibility
//! - Expose ledger commands and derived views as sync FRB functions.
//! - Enforce caller-side input rules before commands reach the store:
//!   non-empty names, positive finite amounts, known type and locale tags.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One command runs at a time per process; each call loads, mutates and
//!   persists the ledger under a process-wide lock.

use chrono::{Local, NaiveDate};
use ledger_core::db::open_db;
use ledger_core::{
    core_version as core_version_inner, export_file_name, init_logging as init_logging_inner,
    ping as ping_inner, ActivityEntry, BalanceStatus, ItemAdjustment, ItemAdjustmentDraft,
    ItemAdjustmentType, Language, LedgerStore, SqliteSlotRepository, Transaction,
    TransactionDraft, TransactionType,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const LEDGER_DB_FILE_NAME: &str = "ledger_store.sqlite3";
static LEDGER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static LEDGER_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for ledger commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerActionResponse {
    /// Whether the command was accepted and persisted.
    pub ok: bool,
    /// Id of the created record, when the command created one.
    pub record_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl LedgerActionResponse {
    fn created(message: impl Into<String>, record_id: String) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            message: message.into(),
        }
    }

    fn done(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            record_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }

    fn from_result(result: Result<Self, String>, operation: &str) -> Self {
        result.unwrap_or_else(|err| Self::failure(format!("{operation} failed: {err}")))
    }
}

/// Person row with its derived balance.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonView {
    pub id: String,
    pub name: String,
    pub created_at: String,
    /// Positive: the user owes this person. Negative: they owe the user.
    pub final_balance: f64,
    /// `i_owe|owed_to_me|balanced`.
    pub status: String,
}

/// One transaction or item adjustment of a person's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntryView {
    pub id: String,
    pub person_id: String,
    /// `transaction|item_adjustment`.
    pub entry_kind: String,
    /// `borrowed|given|returned|given_by_me|given_to_me`.
    pub kind: String,
    /// Set for item adjustments only.
    pub item_name: Option<String>,
    pub amount: f64,
    pub date: String,
    pub time: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonBalanceView {
    pub total_borrowed: f64,
    pub total_given: f64,
    pub total_returned: f64,
    pub total_items_given_by_me: f64,
    pub total_items_given_to_me: f64,
    pub final_balance: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallStatsView {
    pub total_borrowed: f64,
    pub total_given: f64,
    pub total_adjustments: f64,
    pub overall_balance: f64,
    pub status: String,
}

/// Export payload ready to be written by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerExportResponse {
    pub ok: bool,
    /// Suggested file name carrying today's date.
    pub file_name: String,
    pub content: String,
    pub message: String,
}

/// Lists people in insertion order with their balances.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_list_people() -> Vec<PersonView> {
    with_ledger_store(|store| {
        Ok(store
            .state()
            .persons
            .iter()
            .map(|person| {
                let balance = store.balance_for(&person.id);
                PersonView {
                    id: person.id.clone(),
                    name: person.name.clone(),
                    created_at: person.created_at.clone(),
                    final_balance: balance.final_balance,
                    status: status_label(balance.status()).to_string(),
                }
            })
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call=ledger_list_people error={err}");
        Vec::new()
    })
}

/// Returns one person's entries, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_person_activity(person_id: String) -> Vec<LedgerEntryView> {
    with_ledger_store(|store| {
        Ok(store
            .person_activity(person_id.trim())
            .into_iter()
            .map(to_entry_view)
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call=ledger_person_activity error={err}");
        Vec::new()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_add_person(name: String) -> LedgerActionResponse {
    let result = required_text(&name, "name").and_then(|name| {
        with_ledger_store(|store| {
            let id = store.add_person(name).map_err(|err| err.to_string())?;
            Ok(LedgerActionResponse::created("Person added.", id))
        })
    });
    LedgerActionResponse::from_result(result, "ledger_add_person")
}

/// Deletes a person and every entry recorded against them.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_delete_person(person_id: String) -> LedgerActionResponse {
    let result = with_ledger_store(|store| {
        store
            .delete_person(person_id.trim())
            .map_err(|err| err.to_string())?;
        Ok(LedgerActionResponse::done("Person deleted."))
    });
    LedgerActionResponse::from_result(result, "ledger_delete_person")
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_add_transaction(
    person_id: String,
    kind: String,
    amount: f64,
    date: String,
    time: String,
    description: String,
) -> LedgerActionResponse {
    let result = parse_transaction_draft(person_id, &kind, amount, date, time, description)
        .and_then(|draft| {
            with_ledger_store(|store| {
                if store.person(&draft.person_id).is_none() {
                    return Err(format!("person not found: {}", draft.person_id));
                }
                let id = store
                    .add_transaction(draft)
                    .map_err(|err| err.to_string())?;
                Ok(LedgerActionResponse::created("Transaction added.", id))
            })
        });
    LedgerActionResponse::from_result(result, "ledger_add_transaction")
}

/// Replaces an existing transaction's editable fields.
///
/// Unknown ids leave the ledger unchanged and still report `ok`.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_update_transaction(
    id: String,
    kind: String,
    amount: f64,
    date: String,
    time: String,
    description: String,
) -> LedgerActionResponse {
    let result = with_ledger_store(|store| {
        let Some(existing) = find_transaction(store, id.trim()) else {
            return Ok(LedgerActionResponse::done(
                "Transaction not found; nothing changed.",
            ));
        };
        let draft = parse_transaction_draft(
            existing.person_id.clone(),
            &kind,
            amount,
            date,
            time,
            description,
        )?;
        store
            .update_transaction(Transaction {
                kind: draft.kind,
                amount: draft.amount,
                date: draft.date,
                time: draft.time,
                description: draft.description,
                ..existing
            })
            .map_err(|err| err.to_string())?;
        Ok(LedgerActionResponse::done("Transaction updated."))
    });
    LedgerActionResponse::from_result(result, "ledger_update_transaction")
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_delete_transaction(id: String) -> LedgerActionResponse {
    let result = with_ledger_store(|store| {
        store
            .delete_transaction(id.trim())
            .map_err(|err| err.to_string())?;
        Ok(LedgerActionResponse::done("Transaction deleted."))
    });
    LedgerActionResponse::from_result(result, "ledger_delete_transaction")
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_add_item_adjustment(
    person_id: String,
    item_name: String,
    kind: String,
    amount: f64,
    date: String,
    time: String,
    description: String,
) -> LedgerActionResponse {
    let result = parse_item_draft(person_id, item_name, &kind, amount, date, time, description)
        .and_then(|draft| {
            with_ledger_store(|store| {
                if store.person(&draft.person_id).is_none() {
                    return Err(format!("person not found: {}", draft.person_id));
                }
                let id = store
                    .add_item_adjustment(draft)
                    .map_err(|err| err.to_string())?;
                Ok(LedgerActionResponse::created("Item adjustment added.", id))
            })
        });
    LedgerActionResponse::from_result(result, "ledger_add_item_adjustment")
}

/// Replaces an existing item adjustment's editable fields.
///
/// Unknown ids leave the ledger unchanged and still report `ok`.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_update_item_adjustment(
    id: String,
    item_name: String,
    kind: String,
    amount: f64,
    date: String,
    time: String,
    description: String,
) -> LedgerActionResponse {
    let result = with_ledger_store(|store| {
        let Some(existing) = find_item_adjustment(store, id.trim()) else {
            return Ok(LedgerActionResponse::done(
                "Item adjustment not found; nothing changed.",
            ));
        };
        let draft = parse_item_draft(
            existing.person_id.clone(),
            item_name,
            &kind,
            amount,
            date,
            time,
            description,
        )?;
        store
            .update_item_adjustment(ItemAdjustment {
                item_name: draft.item_name,
                kind: draft.kind,
                amount: draft.amount,
                date: draft.date,
                time: draft.time,
                description: draft.description,
                ..existing
            })
            .map_err(|err| err.to_string())?;
        Ok(LedgerActionResponse::done("Item adjustment updated."))
    });
    LedgerActionResponse::from_result(result, "ledger_update_item_adjustment")
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_delete_item_adjustment(id: String) -> LedgerActionResponse {
    let result = with_ledger_store(|store| {
        store
            .delete_item_adjustment(id.trim())
            .map_err(|err| err.to_string())?;
        Ok(LedgerActionResponse::done("Item adjustment deleted."))
    });
    LedgerActionResponse::from_result(result, "ledger_delete_item_adjustment")
}

/// Stores the locale tag (`en|ur`) used by the shell's string tables.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_set_language(tag: String) -> LedgerActionResponse {
    let result = tag
        .parse::<Language>()
        .map_err(|err| err.to_string())
        .and_then(|language| {
            with_ledger_store(|store| {
                store
                    .set_language(language)
                    .map_err(|err| err.to_string())?;
                Ok(LedgerActionResponse::done("Language updated."))
            })
        });
    LedgerActionResponse::from_result(result, "ledger_set_language")
}

/// Returns the stored locale tag, `en` when the ledger cannot be read.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_get_language() -> String {
    with_ledger_store(|store| Ok(store.language()))
        .unwrap_or_default()
        .as_tag()
        .to_string()
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_person_balance(person_id: String) -> PersonBalanceView {
    let balance = with_ledger_store(|store| Ok(store.balance_for(person_id.trim())))
        .unwrap_or_default();
    PersonBalanceView {
        total_borrowed: balance.total_borrowed,
        total_given: balance.total_given,
        total_returned: balance.total_returned,
        total_items_given_by_me: balance.total_items_given_by_me,
        total_items_given_to_me: balance.total_items_given_to_me,
        final_balance: balance.final_balance,
        status: status_label(balance.status()).to_string(),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn ledger_overall_stats() -> OverallStatsView {
    let stats = with_ledger_store(|store| Ok(store.overall_stats())).unwrap_or_default();
    OverallStatsView {
        total_borrowed: stats.total_borrowed,
        total_given: stats.total_given,
        total_adjustments: stats.total_adjustments,
        overall_balance: stats.overall_balance,
        status: status_label(stats.status()).to_string(),
    }
}

/// Encodes the whole ledger for a backup file named with today's date.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_export() -> LedgerExportResponse {
    let file_name = export_file_name(today());
    match with_ledger_store(|store| store.export_data().map_err(|err| err.to_string())) {
        Ok(content) => LedgerExportResponse {
            ok: true,
            file_name,
            content,
            message: "Data exported.".to_string(),
        },
        Err(err) => LedgerExportResponse {
            ok: false,
            file_name,
            content: String::new(),
            message: format!("ledger_export failed: {err}"),
        },
    }
}

/// Replaces the ledger with the contents of a backup file.
///
/// Unrecognized or empty backups are rejected and leave the ledger as is.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_import(content: String) -> LedgerActionResponse {
    let result = with_ledger_store(|store| {
        store.import_data(&content).map_err(|err| err.to_string())?;
        Ok(LedgerActionResponse::done("Data imported."))
    });
    LedgerActionResponse::from_result(result, "ledger_import")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_ledger_db_path() -> PathBuf {
    LEDGER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LEDGER_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(LEDGER_DB_FILE_NAME)
        })
        .clone()
}

fn with_ledger_store<T>(
    f: impl FnOnce(&mut LedgerStore<SqliteSlotRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = LEDGER_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let db_path = resolve_ledger_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("ledger DB open failed: {err}"))?;
    let mut store = LedgerStore::open(SqliteSlotRepository::new(&conn));
    f(&mut store)
}

fn find_transaction(
    store: &LedgerStore<SqliteSlotRepository<'_>>,
    id: &str,
) -> Option<Transaction> {
    store
        .state()
        .transactions
        .iter()
        .find(|transaction| transaction.id == id)
        .cloned()
}

fn find_item_adjustment(
    store: &LedgerStore<SqliteSlotRepository<'_>>,
    id: &str,
) -> Option<ItemAdjustment> {
    store
        .state()
        .item_adjustments
        .iter()
        .find(|adjustment| adjustment.id == id)
        .cloned()
}

fn required_text(value: &str, field: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn positive_amount(amount: f64) -> Result<f64, String> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(format!("amount must be a positive number, got {amount}"))
    }
}

fn parse_transaction_draft(
    person_id: String,
    kind: &str,
    amount: f64,
    date: String,
    time: String,
    description: String,
) -> Result<TransactionDraft, String> {
    Ok(TransactionDraft {
        person_id: required_text(&person_id, "person_id")?,
        kind: kind
            .trim()
            .parse::<TransactionType>()
            .map_err(|err| err.to_string())?,
        amount: positive_amount(amount)?,
        date: date.trim().to_string(),
        time: time.trim().to_string(),
        description: description.trim().to_string(),
    })
}

fn parse_item_draft(
    person_id: String,
    item_name: String,
    kind: &str,
    amount: f64,
    date: String,
    time: String,
    description: String,
) -> Result<ItemAdjustmentDraft, String> {
    Ok(ItemAdjustmentDraft {
        person_id: required_text(&person_id, "person_id")?,
        item_name: required_text(&item_name, "item_name")?,
        kind: kind
            .trim()
            .parse::<ItemAdjustmentType>()
            .map_err(|err| err.to_string())?,
        amount: positive_amount(amount)?,
        date: date.trim().to_string(),
        time: time.trim().to_string(),
        description: description.trim().to_string(),
    })
}

fn to_entry_view(entry: ActivityEntry<'_>) -> LedgerEntryView {
    match entry {
        ActivityEntry::Transaction(transaction) => LedgerEntryView {
            id: transaction.id.clone(),
            person_id: transaction.person_id.clone(),
            entry_kind: "transaction".to_string(),
            kind: transaction.kind.as_tag().to_string(),
            item_name: None,
            amount: transaction.amount,
            date: transaction.date.clone(),
            time: transaction.time.clone(),
            description: transaction.description.clone(),
            created_at: transaction.created_at.clone(),
        },
        ActivityEntry::ItemAdjustment(adjustment) => LedgerEntryView {
            id: adjustment.id.clone(),
            person_id: adjustment.person_id.clone(),
            entry_kind: "item_adjustment".to_string(),
            kind: adjustment.kind.as_tag().to_string(),
            item_name: Some(adjustment.item_name.clone()),
            amount: adjustment.amount,
            date: adjustment.date.clone(),
            time: adjustment.time.clone(),
            description: adjustment.description.clone(),
            created_at: adjustment.created_at.clone(),
        },
    }
}

fn status_label(status: BalanceStatus) -> &'static str {
    match status {
        BalanceStatus::IOwe => "i_owe",
        BalanceStatus::OwedToMe => "owed_to_me",
        BalanceStatus::Balanced => "balanced",
    }
}
