//! Core types and configuration for the cloudcost system.
//!
//! This crate provides shared types used across all other crates:
//! - Billing data types (observations, normalized rows, forecasts)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, MissingDayPolicy};
pub use error::{Error, Result};
pub use types::*;
