//! Command-line host for the ledger core.
//!
//! # Responsibility
//! - Parse arguments, open the ledger database and run one command.
//! - Enforce caller-side rules (non-empty names, known person ids).

mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Command, WhenArgs};
use ledger_core::db::open_db;
use ledger_core::{
    default_log_level, export_file_name, init_logging, ActivityEntry, BalanceStatus,
    ItemAdjustmentDraft, Language, LedgerStore, SlotRepository, SqliteSlotRepository,
    Transaction, TransactionDraft,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open ledger database `{}`", cli.db.display()))?;
    let mut store = LedgerStore::open(SqliteSlotRepository::new(&conn));
    run(&mut store, cli.command)
}

fn run<R: SlotRepository>(store: &mut LedgerStore<R>, command: Command) -> Result<()> {
    match command {
        Command::People => {
            for person in &store.state().persons {
                let balance = store.balance_for(&person.id);
                println!(
                    "{}  {}  {}",
                    person.id,
                    person.name,
                    describe_balance(balance.final_balance, balance.status())
                );
            }
        }
        Command::AddPerson { name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("name cannot be empty");
            }
            let id = store.add_person(name)?;
            println!("{id}");
        }
        Command::DeletePerson { id } => {
            store.delete_person(&id)?;
        }
        Command::Add {
            person_id,
            kind,
            amount,
            when,
            description,
        } => {
            ensure_person(store, &person_id)?;
            let (date, time) = resolve_when(when);
            let id = store.add_transaction(TransactionDraft {
                person_id,
                kind: kind.into(),
                amount,
                date,
                time,
                description: description.trim().to_string(),
            })?;
            println!("{id}");
        }
        Command::AddItem {
            person_id,
            item_name,
            kind,
            amount,
            when,
            description,
        } => {
            ensure_person(store, &person_id)?;
            let item_name = item_name.trim();
            if item_name.is_empty() {
                bail!("item name cannot be empty");
            }
            let (date, time) = resolve_when(when);
            let id = store.add_item_adjustment(ItemAdjustmentDraft {
                person_id,
                item_name: item_name.to_string(),
                kind: kind.into(),
                amount,
                date,
                time,
                description: description.trim().to_string(),
            })?;
            println!("{id}");
        }
        Command::EditTransaction {
            id,
            kind,
            amount,
            description,
        } => {
            let Some(existing) = store
                .state()
                .transactions
                .iter()
                .find(|transaction| transaction.id == id)
                .cloned()
            else {
                println!("transaction {id} not found; nothing changed");
                return Ok(());
            };
            store.update_transaction(Transaction {
                kind: kind.map_or(existing.kind, Into::into),
                amount: amount.unwrap_or(existing.amount),
                description: description.unwrap_or_else(|| existing.description.clone()),
                ..existing
            })?;
        }
        Command::DeleteEntry { id } => {
            store.delete_transaction(&id)?;
            store.delete_item_adjustment(&id)?;
        }
        Command::Show { person_id } => {
            let Some(person) = store.person(&person_id) else {
                bail!("person not found: {person_id}");
            };
            let balance = store.balance_for(&person_id);
            println!("{}", person.name);
            println!(
                "  borrowed {}  given {}  returned {}  items by me {}  items to me {}",
                balance.total_borrowed,
                balance.total_given,
                balance.total_returned,
                balance.total_items_given_by_me,
                balance.total_items_given_to_me
            );
            println!(
                "  {}",
                describe_balance(balance.final_balance, balance.status())
            );
            for entry in store.person_activity(&person_id) {
                println!("  {}", describe_entry(&entry));
            }
        }
        Command::Stats => {
            let stats = store.overall_stats();
            println!("borrowed    {}", stats.total_borrowed);
            println!("given       {}", stats.total_given);
            println!("adjustments {}", stats.total_adjustments);
            println!(
                "overall     {}",
                describe_balance(stats.overall_balance, stats.status())
            );
        }
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| export_file_name(Local::now().date_naive()).into());
            let content = store.export_data()?;
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            store.import_data(&content)?;
            println!(
                "imported {} people, {} transactions, {} item adjustments",
                store.state().persons.len(),
                store.state().transactions.len(),
                store.state().item_adjustments.len()
            );
        }
        Command::Language { tag: None } => println!("{}", store.language()),
        Command::Language { tag: Some(tag) } => {
            let language = tag.parse::<Language>()?;
            store.set_language(language)?;
        }
    }
    Ok(())
}

fn ensure_person<R: SlotRepository>(store: &LedgerStore<R>, person_id: &str) -> Result<()> {
    if store.person(person_id).is_none() {
        bail!("person not found: {person_id}");
    }
    Ok(())
}

fn resolve_when(when: WhenArgs) -> (String, String) {
    let now = Local::now();
    (
        when.date
            .unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
        when.time.unwrap_or_else(|| now.format("%H:%M").to_string()),
    )
}

fn describe_balance(amount: f64, status: BalanceStatus) -> String {
    match status {
        BalanceStatus::IOwe => format!("you owe {amount}"),
        BalanceStatus::OwedToMe => format!("owes you {}", -amount),
        BalanceStatus::Balanced => "balanced".to_string(),
    }
}

fn describe_entry(entry: &ActivityEntry<'_>) -> String {
    match entry {
        ActivityEntry::Transaction(transaction) => format!(
            "{} {} {}  {} {}  {}",
            transaction.id,
            transaction.kind.as_tag(),
            transaction.amount,
            transaction.date,
            transaction.time,
            transaction.description
        ),
        ActivityEntry::ItemAdjustment(adjustment) => format!(
            "{} {} {} ({})  {} {}  {}",
            adjustment.id,
            adjustment.kind.as_tag(),
            adjustment.amount,
            adjustment.item_name,
            adjustment.date,
            adjustment.time,
            adjustment.description
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_balance, run};
    use crate::cli::{Command, TransactionKindArg, WhenArgs};
    use ledger_core::db::open_db_in_memory;
    use ledger_core::{BalanceStatus, LedgerStore, SqliteSlotRepository};

    #[test]
    fn describe_balance_uses_sign() {
        assert_eq!(describe_balance(50.0, BalanceStatus::IOwe), "you owe 50");
        assert_eq!(describe_balance(-20.0, BalanceStatus::OwedToMe), "owes you 20");
        assert_eq!(describe_balance(0.0, BalanceStatus::Balanced), "balanced");
    }

    #[test]
    fn add_requires_known_person() {
        let conn = open_db_in_memory().unwrap();
        let mut store = LedgerStore::open(SqliteSlotRepository::new(&conn));

        let err = run(
            &mut store,
            Command::Add {
                person_id: "nobody".to_string(),
                kind: TransactionKindArg::Given,
                amount: 10.0,
                when: WhenArgs {
                    date: None,
                    time: None,
                },
                description: String::new(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("person not found"));
        assert!(store.state().transactions.is_empty());
    }

    #[test]
    fn edit_transaction_keeps_untouched_fields() {
        let conn = open_db_in_memory().unwrap();
        let mut store = LedgerStore::open(SqliteSlotRepository::new(&conn));
        let person_id = store.add_person("Javed").unwrap();
        run(
            &mut store,
            Command::Add {
                person_id: person_id.clone(),
                kind: TransactionKindArg::Borrowed,
                amount: 70.0,
                when: WhenArgs {
                    date: Some("2024-07-01".to_string()),
                    time: Some("12:00".to_string()),
                },
                description: "lunch".to_string(),
            },
        )
        .unwrap();
        let id = store.state().transactions[0].id.clone();

        run(
            &mut store,
            Command::EditTransaction {
                id,
                kind: None,
                amount: Some(45.0),
                description: None,
            },
        )
        .unwrap();

        let edited = &store.state().transactions[0];
        assert_eq!(edited.amount, 45.0);
        assert_eq!(edited.description, "lunch");
        assert_eq!(edited.date, "2024-07-01");
        assert_eq!(store.balance_for(&person_id).final_balance, 45.0);
    }
}
