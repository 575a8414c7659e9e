//! The forecasting-model collaborator boundary.

use cloudcost_core::{NormalizedCostRow, QuantileForecast, Result};

/// Black-box forecasting model.
///
/// Given a gap-free, time-indexed history window, returns per-quantile
/// future sequences of length `horizon`. The engine never retries a failed
/// call; retry and timeout policy belong to the caller. Tests substitute a
/// deterministic stub, decoupling aggregation correctness from any model
/// runtime.
pub trait CostModel {
    /// Predict `horizon` future days from `history`.
    fn infer(&self, history: &[NormalizedCostRow], horizon: u32) -> Result<QuantileForecast>;
}
