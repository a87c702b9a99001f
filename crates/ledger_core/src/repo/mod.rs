//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable slot contract the ledger store writes through.
//! - Isolate SQLite query details from store orchestration.

pub mod slot_repo;
