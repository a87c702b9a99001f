//! Aggregate ledger snapshot.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::entry::{ItemAdjustment, Transaction, UnknownTagError};
use super::person::Person;

/// Locale selected by the user. The core only stores the tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    /// Roman Urdu.
    Ur,
}

impl Language {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ur => "ur",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Language {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ur" => Ok(Self::Ur),
            other => Err(UnknownTagError {
                kind: "language",
                tag: other.to_string(),
            }),
        }
    }
}

/// Entire persisted ledger. Replaced wholesale on load and import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub item_adjustments: Vec<ItemAdjustment>,
    #[serde(default)]
    pub language: Language,
}

impl LedgerState {
    /// Returns `true` when no person, transaction or adjustment is recorded.
    pub fn has_no_records(&self) -> bool {
        self.persons.is_empty() && self.transactions.is_empty() && self.item_adjustments.is_empty()
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Language, LedgerState};

    #[test]
    fn default_state_is_empty_english() {
        let state = LedgerState::default();
        assert!(state.has_no_records());
        assert_eq!(state.language, Language::En);
    }

    #[test]
    fn language_tags_are_case_insensitive() {
        assert_eq!(" UR ".parse::<Language>().unwrap(), Language::Ur);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Ur.to_string(), "ur");
    }
}
