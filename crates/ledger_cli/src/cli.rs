//! Clap definitions for the `ledger` command-line host.

use clap::{Parser, Subcommand, ValueEnum};
use ledger_core::{ItemAdjustmentType, TransactionType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ledger",
    version,
    about = "Track money and items exchanged with people you know."
)]
pub(crate) struct Cli {
    /// Ledger database file.
    #[arg(long, env = "LEDGER_DB_PATH", default_value = "ledger.sqlite3")]
    pub db: PathBuf,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "LEDGER_LOG_DIR")]
    pub log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// List people with their balances.
    People,
    /// Add a person.
    AddPerson { name: String },
    /// Delete a person together with all of their entries.
    DeletePerson { id: String },
    /// Record a money transaction.
    Add {
        person_id: String,
        #[arg(value_enum)]
        kind: TransactionKindArg,
        #[arg(value_parser = parse_amount)]
        amount: f64,
        #[command(flatten)]
        when: WhenArgs,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Record an item given or received in place of cash.
    AddItem {
        person_id: String,
        item_name: String,
        #[arg(value_enum)]
        kind: ItemKindArg,
        #[arg(value_parser = parse_amount)]
        amount: f64,
        #[command(flatten)]
        when: WhenArgs,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change the amount or kind of an existing transaction.
    EditTransaction {
        id: String,
        #[arg(long, value_enum)]
        kind: Option<TransactionKindArg>,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<f64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a transaction or item adjustment by id.
    DeleteEntry { id: String },
    /// Show one person's balance and activity.
    Show { person_id: String },
    /// Show totals across everyone.
    Stats,
    /// Write a backup file.
    Export {
        /// Output path; defaults to a dated file name in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the ledger with the contents of a backup file.
    Import { file: PathBuf },
    /// Show or set the stored language tag (en|ur).
    Language { tag: Option<String> },
}

#[derive(clap::Args, Debug)]
pub(crate) struct WhenArgs {
    /// YYYY-MM-DD; defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    /// HH:MM; defaults to now.
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum TransactionKindArg {
    Borrowed,
    Given,
    Returned,
}

impl From<TransactionKindArg> for TransactionType {
    fn from(value: TransactionKindArg) -> Self {
        match value {
            TransactionKindArg::Borrowed => Self::Borrowed,
            TransactionKindArg::Given => Self::Given,
            TransactionKindArg::Returned => Self::Returned,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum ItemKindArg {
    #[value(name = "given_by_me")]
    GivenByMe,
    #[value(name = "given_to_me")]
    GivenToMe,
}

impl From<ItemKindArg> for ItemAdjustmentType {
    fn from(value: ItemKindArg) -> Self {
        match value {
            ItemKindArg::GivenByMe => Self::GivenByMe,
            ItemKindArg::GivenToMe => Self::GivenToMe,
        }
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, String> {
    let amount = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(format!("amount must be greater than zero, got `{raw}`"));
    }
    Ok(amount)
}
