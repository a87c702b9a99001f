//! Flutter-facing bindings for the ledger core.

pub mod api;
