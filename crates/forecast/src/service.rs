//! Per-provider summary orchestration.
//!
//! Reads recent history from the cost store, calls the model collaborator,
//! aggregates its forecast, and assembles the cross-provider report. A
//! summary request never fails outright because one provider's data or
//! model is unavailable.

use chrono::{Duration, NaiveDate};
use cloudcost_core::{
    Config, Error, NormalizedCostRow, ProjectionSummary, Provider, Result,
};
use cloudcost_store::CostStore;
use tracing::debug;

use crate::aggregator::ForecastAggregator;
use crate::assembler::SummaryAssembler;
use crate::model::CostModel;

/// Composes store reads, model inference, and aggregation per provider.
pub struct SummaryService<'a> {
    store: &'a dyn CostStore,
    model: &'a dyn CostModel,
    config: &'a Config,
}

impl<'a> SummaryService<'a> {
    /// Create a service over the given collaborators.
    pub fn new(store: &'a dyn CostStore, model: &'a dyn CostModel, config: &'a Config) -> Self {
        Self {
            store,
            model,
            config,
        }
    }

    /// Summarize every requested provider as of `as_of`.
    ///
    /// Providers whose history, store, or model is unavailable appear in
    /// the report with an explicit unavailable marker.
    pub fn summarize(&self, providers: &[Provider], as_of: NaiveDate) -> cloudcost_core::CostReport {
        let outcomes: Vec<(Provider, Result<ProjectionSummary>)> = providers
            .iter()
            .map(|&provider| (provider, self.summarize_provider(provider, as_of)))
            .collect();
        SummaryAssembler::assemble(outcomes)
    }

    fn summarize_provider(
        &self,
        provider: Provider,
        as_of: NaiveDate,
    ) -> Result<ProjectionSummary> {
        let rows =
            self.store
                .read_recent(provider, self.config.window.lookback_days, as_of)?;
        if rows.len() < self.config.window.min_timesteps {
            return Err(Error::insufficient_history(
                provider.as_str(),
                rows.len(),
                self.config.window.min_timesteps,
            ));
        }

        let history = encoder_window(&rows, self.config.forecast.encoder_days, as_of);
        debug!(
            %provider,
            history_rows = history.len(),
            horizon = self.config.forecast.horizon_days,
            "requesting forecast"
        );

        let forecast = self
            .model
            .infer(&history, self.config.forecast.horizon_days)?;
        ForecastAggregator::aggregate(provider, &forecast).ok_or(Error::EmptyForecast)
    }
}

/// Most-recent `encoder_days` of rows; the model's encoder input window.
fn encoder_window(
    rows: &[NormalizedCostRow],
    encoder_days: u32,
    as_of: NaiveDate,
) -> Vec<NormalizedCostRow> {
    let start = as_of - Duration::days(encoder_days as i64 - 1);
    rows.iter().filter(|r| r.date >= start).cloned().collect()
}
