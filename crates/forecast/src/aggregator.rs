//! Forecast aggregation: per-quantile sequences to scalar projections.
//!
//! Reduces one provider's quantile forecast to weekly, monthly, and yearly
//! projected cost around a representative quantile.

use std::collections::BTreeMap;

use cloudcost_core::{ProjectionSummary, Provider, QuantileForecast};

/// The preferred representative quantile.
const MEDIAN_LABEL: &str = "0.5";

const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Stateless reducer from quantile forecasts to projection summaries.
pub struct ForecastAggregator;

impl ForecastAggregator {
    /// Select the representative quantile label: `"0.5"` if present,
    /// otherwise the lower-middle label of the lexicographically sorted
    /// set. Quantile sets are configuration-driven, so the median label
    /// may be absent; the tie-break is deterministic by construction.
    pub fn representative_label(forecast: &QuantileForecast) -> Option<&str> {
        if forecast.series.contains_key(MEDIAN_LABEL) {
            return Some(MEDIAN_LABEL);
        }
        let labels: Vec<&str> = forecast.labels().collect();
        if labels.is_empty() {
            None
        } else {
            Some(labels[(labels.len() - 1) / 2])
        }
    }

    /// Reduce a quantile forecast to scalar projections.
    ///
    /// `weekly` sums the representative series over whatever horizon is
    /// available (H >= 1; H = 7 is not assumed). `monthly` and `yearly`
    /// scale the horizon's daily average by 30 and 12x30 — a direct
    /// extrapolation of the recent average, not a re-forecast, which
    /// assumes the average is stationary beyond the horizon.
    ///
    /// Every output, including each displayed quantile series value, is
    /// clamped to be non-negative: negative predicted costs are a model
    /// artifact and must never surface to a user.
    ///
    /// Returns `None` when the forecast has no quantile labels or the
    /// representative series is empty, so the caller can render an
    /// explicit empty state.
    pub fn aggregate(provider: Provider, forecast: &QuantileForecast) -> Option<ProjectionSummary> {
        let label = Self::representative_label(forecast)?;
        let selected = &forecast.series[label];
        if selected.is_empty() {
            return None;
        }

        let weekly: f64 = selected.iter().map(|v| v.max(0.0)).sum();
        let daily_average = weekly / selected.len() as f64;
        let monthly = daily_average * DAYS_PER_MONTH;
        let yearly = monthly * MONTHS_PER_YEAR;

        let quantile_series: BTreeMap<String, Vec<f64>> = forecast
            .series
            .iter()
            .map(|(label, values)| {
                (
                    label.clone(),
                    values.iter().map(|v| v.max(0.0)).collect(),
                )
            })
            .collect();

        Some(ProjectionSummary {
            provider,
            weekly,
            monthly,
            yearly,
            quantile_series,
        })
    }
}
