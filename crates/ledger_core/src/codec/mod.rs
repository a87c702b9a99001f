//! Ledger import/export encodings.
//!
//! # Responsibility
//! - Export the full ledger to the canonical sectioned row format.
//! - Import either the row format or the legacy whole-state JSON snapshot.
//! - Encode/decode the JSON snapshot kept in the durable storage slot.
//!
//! # Invariants
//! - `deserialize(serialize(state))` reproduces persons, transactions and
//!   item adjustments in order. The row format does not carry `language`.
//! - An import that yields no records at all is a failure, not a wipe.
//! - Codec calls are stateless.

use crate::model::state::LedgerState;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod rows;
pub mod snapshot;

pub type CodecResult<T> = Result<T, CodecError>;

/// Error for ledger import/export.
#[derive(Debug)]
pub enum CodecError {
    /// Text matches neither the row format nor a JSON snapshot.
    UnrecognizedFormat,
    /// Text parsed but contained no persons, transactions or adjustments.
    EmptyImport,
    Csv(csv::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    /// A row in a known section carries an unusable value.
    InvalidRow {
        section: &'static str,
        line: u64,
        message: String,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedFormat => write!(f, "unrecognized ledger data format"),
            Self::EmptyImport => write!(f, "ledger data contains no records"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidRow {
                section,
                line,
                message,
            } => write!(f, "invalid {section} row at line {line}: {message}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnrecognizedFormat | Self::EmptyImport | Self::InvalidRow { .. } => None,
        }
    }
}

impl CodecError {
    /// Content-free `key=value` fields for log lines.
    ///
    /// Never includes the offending value, which may be a name or a
    /// description taken from the imported text.
    pub fn log_fields(&self) -> String {
        match self {
            Self::UnrecognizedFormat => "error_code=unrecognized_format".to_string(),
            Self::EmptyImport => "error_code=empty_import".to_string(),
            Self::Csv(err) => match err.position() {
                Some(position) => format!("error_code=csv line={}", position.line()),
                None => "error_code=csv".to_string(),
            },
            Self::Json(err) => format!(
                "error_code=json line={} column={}",
                err.line(),
                err.column()
            ),
            Self::Io(err) => format!("error_code=io kind={:?}", err.kind()),
            Self::InvalidRow { section, line, .. } => format!(
                "error_code=invalid_row section={} line={line}",
                section.replace(' ', "_")
            ),
        }
    }
}

impl From<csv::Error> for CodecError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for CodecError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Shape of a piece of ledger text, decided before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Canonical sectioned rows (`### PERSONS ###` ...).
    Rows,
    /// Legacy whole-state JSON object.
    Snapshot,
    Unrecognized,
}

impl DataFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Snapshot => "snapshot",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classifies `text` without parsing it.
pub fn detect_format(text: &str) -> DataFormat {
    let body = strip_bom(text).trim_start();
    if body.starts_with('{') {
        return DataFormat::Snapshot;
    }
    if body.lines().any(rows::is_section_marker) {
        return DataFormat::Rows;
    }
    DataFormat::Unrecognized
}

/// Encodes the full ledger in the canonical row format.
pub fn serialize(state: &LedgerState) -> CodecResult<String> {
    rows::encode(state)
}

/// Decodes ledger text in either supported format.
///
/// # Errors
/// - `UnrecognizedFormat` when the text matches neither format.
/// - `EmptyImport` when all three collections come back empty.
/// - Parse errors from the detected format.
pub fn deserialize(text: &str) -> CodecResult<LedgerState> {
    let format = detect_format(text);
    let state = match format {
        DataFormat::Rows => rows::decode(strip_bom(text))?,
        DataFormat::Snapshot => snapshot::decode(strip_bom(text))?,
        DataFormat::Unrecognized => {
            warn!("event=ledger_decode module=codec status=error error_code=unrecognized_format");
            return Err(CodecError::UnrecognizedFormat);
        }
    };

    if state.has_no_records() {
        warn!(
            "event=ledger_decode module=codec status=error format={} error_code=empty_import",
            format.as_str()
        );
        return Err(CodecError::EmptyImport);
    }

    info!(
        "event=ledger_decode module=codec status=ok format={} persons={} transactions={} item_adjustments={}",
        format.as_str(),
        state.persons.len(),
        state.transactions.len(),
        state.item_adjustments.len()
    );
    Ok(state)
}

/// File name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("ledger-backup-{}.csv", date.format("%Y-%m-%d"))
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
