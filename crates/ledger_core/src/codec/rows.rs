//! Sectioned row format.
//!
//! ```text
//! ### PERSONS ###
//! id,name,createdAt
//! ...
//!
//! ### TRANSACTIONS ###
//! id,personId,type,amount,date,time,description,createdAt
//! ...
//!
//! ### ITEM_ADJUSTMENTS ###
//! id,personId,itemName,amount,type,date,time,description,createdAt
//! ...
//! ```
//!
//! Fields follow CSV quoting rules, so free text may contain commas, quotes
//! and line breaks.

use super::{CodecError, CodecResult};
use crate::model::entry::{ItemAdjustment, Transaction};
use crate::model::person::Person;
use crate::model::state::LedgerState;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::debug;

const PERSONS_MARKER: &str = "### PERSONS ###";
const TRANSACTIONS_MARKER: &str = "### TRANSACTIONS ###";
const ITEM_ADJUSTMENTS_MARKER: &str = "### ITEM_ADJUSTMENTS ###";

const PERSONS_HEADER: [&str; 3] = ["id", "name", "createdAt"];
const TRANSACTIONS_HEADER: [&str; 8] = [
    "id",
    "personId",
    "type",
    "amount",
    "date",
    "time",
    "description",
    "createdAt",
];
const ITEM_ADJUSTMENTS_HEADER: [&str; 9] = [
    "id",
    "personId",
    "itemName",
    "amount",
    "type",
    "date",
    "time",
    "description",
    "createdAt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Persons,
    Transactions,
    ItemAdjustments,
}

impl Section {
    fn from_marker(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.starts_with(PERSONS_MARKER) {
            Some(Self::Persons)
        } else if line.starts_with(TRANSACTIONS_MARKER) {
            Some(Self::Transactions)
        } else if line.starts_with(ITEM_ADJUSTMENTS_MARKER) {
            Some(Self::ItemAdjustments)
        } else {
            None
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Persons => "person",
            Self::Transactions => "transaction",
            Self::ItemAdjustments => "item adjustment",
        }
    }

    fn header(self) -> &'static [&'static str] {
        match self {
            Self::Persons => &PERSONS_HEADER,
            Self::Transactions => &TRANSACTIONS_HEADER,
            Self::ItemAdjustments => &ITEM_ADJUSTMENTS_HEADER,
        }
    }

    fn min_fields(self) -> usize {
        self.header().len()
    }

    /// Matches this section's column header exactly, nothing looser.
    fn is_header(self, record: &StringRecord) -> bool {
        record.iter().eq(self.header().iter().copied())
    }
}

/// Returns `true` when `line` opens one of the three sections.
pub fn is_section_marker(line: &str) -> bool {
    Section::from_marker(line).is_some()
}

/// Encodes persons, transactions and item adjustments, in that order.
pub fn encode(state: &LedgerState) -> CodecResult<String> {
    let persons = encode_section(
        PERSONS_MARKER,
        &PERSONS_HEADER,
        state.persons.iter().map(person_fields),
    )?;
    let transactions = encode_section(
        TRANSACTIONS_MARKER,
        &TRANSACTIONS_HEADER,
        state.transactions.iter().map(transaction_fields),
    )?;
    let item_adjustments = encode_section(
        ITEM_ADJUSTMENTS_MARKER,
        &ITEM_ADJUSTMENTS_HEADER,
        state.item_adjustments.iter().map(item_adjustment_fields),
    )?;

    Ok([persons, transactions, item_adjustments].join("\n"))
}

/// Decodes row-format text into a state with the default language.
///
/// Rows before the first section marker, header rows and rows with too few
/// fields are skipped. Data fields are kept verbatim; only the type tag and
/// amount tolerate surrounding whitespace.
pub fn decode(text: &str) -> CodecResult<LedgerState> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut state = LedgerState::default();
    let mut section: Option<Section> = None;
    let mut skipped_rows = 0_usize;

    for record in reader.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        if record.len() == 1 {
            if let Some(next) = record.get(0).and_then(Section::from_marker) {
                section = Some(next);
                continue;
            }
        }
        let Some(current) = section else {
            skipped_rows += 1;
            continue;
        };
        if current.is_header(&record) {
            continue;
        }
        if record.len() < current.min_fields() {
            skipped_rows += 1;
            continue;
        }

        let line = record.position().map_or(0, |position| position.line());
        let row = Row {
            record: &record,
            section: current,
            line,
        };
        match current {
            Section::Persons => state.persons.push(row.person()),
            Section::Transactions => state.transactions.push(row.transaction()?),
            Section::ItemAdjustments => state.item_adjustments.push(row.item_adjustment()?),
        }
    }

    if skipped_rows > 0 {
        debug!("event=ledger_decode module=codec status=partial format=rows skipped_rows={skipped_rows}");
    }
    Ok(state)
}

fn encode_section<I>(marker: &str, header: &[&str], rows: I) -> CodecResult<String>
where
    I: Iterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([marker])?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|err| CodecError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| CodecError::Io(std::io::Error::other(err)))
}

fn person_fields(person: &Person) -> Vec<String> {
    vec![
        person.id.clone(),
        person.name.clone(),
        person.created_at.clone(),
    ]
}

fn transaction_fields(transaction: &Transaction) -> Vec<String> {
    vec![
        transaction.id.clone(),
        transaction.person_id.clone(),
        transaction.kind.as_tag().to_string(),
        transaction.amount.to_string(),
        transaction.date.clone(),
        transaction.time.clone(),
        transaction.description.clone(),
        transaction.created_at.clone(),
    ]
}

fn item_adjustment_fields(adjustment: &ItemAdjustment) -> Vec<String> {
    vec![
        adjustment.id.clone(),
        adjustment.person_id.clone(),
        adjustment.item_name.clone(),
        adjustment.amount.to_string(),
        adjustment.kind.as_tag().to_string(),
        adjustment.date.clone(),
        adjustment.time.clone(),
        adjustment.description.clone(),
        adjustment.created_at.clone(),
    ]
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// One data row inside a known section.
struct Row<'r> {
    record: &'r StringRecord,
    section: Section,
    line: u64,
}

impl Row<'_> {
    fn field(&self, index: usize) -> String {
        self.record.get(index).unwrap_or_default().to_string()
    }

    fn trimmed(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or_default().trim()
    }

    fn invalid(&self, message: impl Into<String>) -> CodecError {
        CodecError::InvalidRow {
            section: self.section.name(),
            line: self.line,
            message: message.into(),
        }
    }

    fn amount(&self, index: usize) -> CodecResult<f64> {
        let raw = self.trimmed(index);
        match raw.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Ok(amount),
            _ => Err(self.invalid(format!("amount `{raw}` is not a number"))),
        }
    }

    fn person(&self) -> Person {
        Person {
            id: self.field(0),
            name: self.field(1),
            created_at: self.field(2),
        }
    }

    fn transaction(&self) -> CodecResult<Transaction> {
        Ok(Transaction {
            id: self.field(0),
            person_id: self.field(1),
            kind: self
                .trimmed(2)
                .parse()
                .map_err(|err| self.invalid(format!("{err}")))?,
            amount: self.amount(3)?,
            date: self.field(4),
            time: self.field(5),
            description: self.field(6),
            created_at: self.field(7),
        })
    }

    fn item_adjustment(&self) -> CodecResult<ItemAdjustment> {
        Ok(ItemAdjustment {
            id: self.field(0),
            person_id: self.field(1),
            item_name: self.field(2),
            amount: self.amount(3)?,
            kind: self
                .trimmed(4)
                .parse()
                .map_err(|err| self.invalid(format!("{err}")))?,
            date: self.field(5),
            time: self.field(6),
            description: self.field(7),
            created_at: self.field(8),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, is_section_marker};
    use crate::codec::CodecError;
    use crate::model::person::Person;
    use crate::model::state::LedgerState;

    #[test]
    fn section_markers_tolerate_surrounding_whitespace() {
        assert!(is_section_marker("  ### ITEM_ADJUSTMENTS ###  "));
        assert!(!is_section_marker("### NOTES ###"));
    }

    #[test]
    fn empty_state_encodes_three_headed_sections() {
        let text = encode(&LedgerState::default()).unwrap();
        assert_eq!(
            text,
            "### PERSONS ###\nid,name,createdAt\n\n\
             ### TRANSACTIONS ###\nid,personId,type,amount,date,time,description,createdAt\n\n\
             ### ITEM_ADJUSTMENTS ###\nid,personId,itemName,amount,type,date,time,description,createdAt\n"
        );
    }

    #[test]
    fn quotes_and_commas_in_names_are_escaped() {
        let state = LedgerState {
            persons: vec![Person {
                id: "p1".to_string(),
                name: "Khan, \"Chacha\"".to_string(),
                created_at: "2024-01-01T00:00:00.000Z".to_string(),
            }],
            ..LedgerState::default()
        };

        let text = encode(&state).unwrap();
        assert!(text.contains("p1,\"Khan, \"\"Chacha\"\"\",2024-01-01T00:00:00.000Z"));
        assert_eq!(decode(&text).unwrap().persons, state.persons);
    }

    #[test]
    fn reads_legacy_always_quoted_rows() {
        let text = "### PERSONS ###\r\n\
                    id,name,createdAt\r\n\
                    abc123xyz,\"Ali\",2024-01-01T00:00:00.000Z\r\n\
                    \r\n\
                    ### TRANSACTIONS ###\r\n\
                    id,personId,type,amount,date,time,description,createdAt\r\n\
                    t1,abc123xyz,borrowed,500,2024-01-02,10:15,\"\",2024-01-02T10:15:00.000Z\r\n";

        let state = decode(text).unwrap();
        assert_eq!(state.persons[0].name, "Ali");
        assert_eq!(state.transactions[0].amount, 500.0);
        assert_eq!(state.transactions[0].description, "");
        assert_eq!(
            state.transactions[0].created_at,
            "2024-01-02T10:15:00.000Z"
        );
    }

    #[test]
    fn short_rows_are_skipped() {
        let text = "### TRANSACTIONS ###\nt1,p1,given\n";
        let state = decode(text).unwrap();
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn unknown_type_tag_fails_with_line() {
        let text = "### TRANSACTIONS ###\n\
                    id,personId,type,amount,date,time,description,createdAt\n\
                    t1,p1,lent,5,2024-01-02,10:15,,2024-01-02T10:15:00.000Z\n";
        let err = decode(text).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidRow { section: "transaction", line: 3, .. }
        ));
    }

    #[test]
    fn unparseable_amount_fails() {
        let text = "### ITEM_ADJUSTMENTS ###\n\
                    a1,p1,rice,lots,given_by_me,2024-01-02,10:15,,2024-01-02T10:15:00.000Z\n";
        let err = decode(text).unwrap_err();
        assert!(err.to_string().contains("lots"));
    }
}
