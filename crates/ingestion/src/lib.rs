//! Billing ingestion and normalization for the cloudcost system.
//!
//! This crate handles:
//! - Currency normalization into the canonical accounting currency
//! - Series contiguity building (gap-free daily sequences per entity key)
//! - The ingest pipeline that persists normalized rows through a `CostStore`

pub mod currency;
pub mod pipeline;
pub mod series;

pub use currency::{ConversionStrategy, CurrencyNormalizer};
pub use pipeline::{IngestPipeline, IngestReport};
pub use series::SeriesBuilder;
