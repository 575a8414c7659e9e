//! Series contiguity building.
//!
//! Turns a sparse set of normalized observations for each entity key into a
//! gap-free daily sequence spanning a bounded lookback window, with a
//! window-aligned time index per row.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use cloudcost_core::config::WindowConfig;
use cloudcost_core::{EntityKey, Error, MissingDayPolicy, NormalizedCostRow};
use tracing::debug;

/// One observation after currency normalization: the entity it belongs to,
/// the day it covers, and its cost in the canonical currency.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedObservation {
    pub key: EntityKey,
    pub date: NaiveDate,
    pub cost: f64,
}

/// Result of one build: the gap-free rows plus exclusion counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutcome {
    /// Rows sorted by entity key, then date ascending.
    pub rows: Vec<NormalizedCostRow>,
    /// Entities dropped for having too little history in the window.
    pub entities_excluded: usize,
}

/// Builds contiguous, time-indexed daily series per entity key.
pub struct SeriesBuilder {
    lookback_days: u32,
    min_timesteps: usize,
    missing_day: MissingDayPolicy,
}

impl SeriesBuilder {
    /// Create a builder from window configuration.
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            lookback_days: config.lookback_days,
            min_timesteps: config.min_timesteps,
            missing_day: config.missing_day,
        }
    }

    /// First day of the window ending at `as_of` (inclusive).
    fn window_start(&self, as_of: NaiveDate) -> NaiveDate {
        as_of - Duration::days(self.lookback_days as i64 - 1)
    }

    /// Build gap-free rows over the window ending at `as_of`.
    ///
    /// Observations outside the window contribute nothing. Multiple
    /// observations for the same entity and date are summed, since several
    /// raw billing line items can legitimately make up one daily total.
    /// Entities with fewer observed days than the configured minimum are
    /// excluded entirely rather than padded.
    ///
    /// `time_idx` counts days since the window start, so series from
    /// different entity keys in the same run share an alignment.
    pub fn build(
        &self,
        observations: &[NormalizedObservation],
        as_of: NaiveDate,
    ) -> BuildOutcome {
        let start = self.window_start(as_of);

        // Group by entity key, summing duplicate dates.
        let mut grouped: BTreeMap<EntityKey, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        for obs in observations {
            if obs.date < start || obs.date > as_of {
                continue;
            }
            *grouped
                .entry(obs.key.clone())
                .or_default()
                .entry(obs.date)
                .or_insert(0.0) += obs.cost;
        }

        let mut outcome = BuildOutcome::default();
        for (key, observed) in grouped {
            if observed.len() < self.min_timesteps {
                let err =
                    Error::insufficient_history(key.to_string(), observed.len(), self.min_timesteps);
                debug!(%err, "excluding entity");
                outcome.entities_excluded += 1;
                continue;
            }

            outcome.rows.extend(self.fill(&key, &observed, start, as_of));
        }

        outcome
    }

    /// Walk every calendar day in the window, emitting observed costs and
    /// filling the rest per the missing-day policy.
    fn fill(
        &self,
        key: &EntityKey,
        observed: &BTreeMap<NaiveDate, f64>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<NormalizedCostRow> {
        let mut rows = Vec::with_capacity(self.lookback_days as usize);
        let mut last_observed = None;
        let mut date = start;
        let mut time_idx = 0i64;

        while date <= end {
            let cost = match observed.get(&date) {
                Some(&cost) => {
                    last_observed = Some(cost);
                    Some(cost)
                }
                None => self.missing_day.fill(last_observed),
            };

            if let Some(cost) = cost {
                rows.push(NormalizedCostRow {
                    provider: key.provider,
                    service: key.service.clone(),
                    region: key.region.clone(),
                    currency: key.currency.clone(),
                    date,
                    cost,
                    time_idx,
                });
            }

            date += Duration::days(1);
            time_idx += 1;
        }

        rows
    }
}
