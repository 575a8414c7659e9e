//! Forecast aggregation and summary assembly for the cloudcost system.
//!
//! This crate provides:
//! - The `CostModel` collaborator boundary
//! - Quantile-forecast aggregation into weekly/monthly/yearly projections
//! - Cross-provider summary assembly

pub mod aggregator;
pub mod assembler;
pub mod model;
pub mod service;

pub use aggregator::ForecastAggregator;
pub use assembler::SummaryAssembler;
pub use model::CostModel;
pub use service::SummaryService;
