//! Error types for the cloudcost system.

use thiserror::Error;

use crate::types::Provider;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the cloudcost system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (invalid or malformed input).
    #[error("Data error: {0}")]
    Data(String),

    /// Missing or non-positive currency conversion input. The affected
    /// observation is dropped; the run continues for other observations.
    #[error("Invalid conversion rate for {provider} ({currency}): {reason}")]
    InvalidRate {
        provider: Provider,
        currency: String,
        reason: String,
    },

    /// An entity key has fewer observed timesteps than the minimum.
    /// Soft: the entity is excluded, not fatal to the run.
    #[error("Insufficient history for {key}: {observed} observed days, need {required}")]
    InsufficientHistory {
        key: String,
        observed: usize,
        required: usize,
    },

    /// The aggregator received no usable quantile data. Soft: the
    /// provider's summary is marked unavailable.
    #[error("Forecast contains no usable quantile data")]
    EmptyForecast,

    /// Database error from a store implementation.
    #[error("Database error: {0}")]
    Database(String),

    /// A collaborator boundary call (store or model) failed. Surfaced to
    /// the caller, which owns retry/backoff policy.
    #[error("Collaborator failure: {0}")]
    Collaborator(anyhow::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create an invalid-rate error.
    pub fn invalid_rate(
        provider: Provider,
        currency: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidRate {
            provider,
            currency: currency.into(),
            reason: reason.into(),
        }
    }

    /// Create an insufficient-history error.
    pub fn insufficient_history(
        key: impl Into<String>,
        observed: usize,
        required: usize,
    ) -> Self {
        Error::InsufficientHistory {
            key: key.into(),
            observed,
            required,
        }
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Error::Database(msg.into())
    }

    /// Wrap an arbitrary collaborator failure.
    pub fn collaborator(err: impl Into<anyhow::Error>) -> Self {
        Error::Collaborator(err.into())
    }
}
