//! Ledger domain model.
//!
//! # Responsibility
//! - Define the plain records held by the ledger: people, money
//!   transactions, item adjustments, and the aggregate state snapshot.
//!
//! # Invariants
//! - Every record is identified by a string id unique within its collection.
//! - Transactions and item adjustments reference a person by `person_id`.
//! - Collections keep insertion order; display ordering is a reader concern.

pub mod entry;
pub mod person;
pub mod state;

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{generate_id, timestamp_now};
    use std::collections::HashSet;

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids = (0..256).map(|_| generate_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn timestamp_is_utc_rfc3339_with_millis() {
        let now = timestamp_now();
        assert!(now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
        assert_eq!(now.len(), "2024-01-01T00:00:00.000Z".len());
    }
}
