//! Durable storage for normalized daily cost rows.
//!
//! This crate provides:
//! - The `CostStore` collaborator contract (idempotent keyed upsert + recent reads)
//! - A SQLite-backed reference implementation

pub mod contract;
pub mod sqlite;

pub use contract::CostStore;
pub use sqlite::SqliteCostStore;
