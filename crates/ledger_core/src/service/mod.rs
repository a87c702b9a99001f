//! Ledger use-case services.
//!
//! # Responsibility
//! - Apply ledger commands and persist their results (`ledger_store`).
//! - Derive balances and display views from a state (`balance`, `activity`).
//! - Keep UI/FFI layers decoupled from storage and encoding details.

pub mod activity;
pub mod balance;
pub mod ledger_store;
pub mod reducer;
