//! Core data types for the cloudcost system.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Cloud provider a billing record originates from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gcp,
    Azure,
}

impl Provider {
    /// All providers the engine knows about.
    pub const ALL: [Provider; 2] = [Provider::Gcp, Provider::Azure];

    /// Lowercase name as stored and displayed.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Gcp => "gcp",
            Provider::Azure => "azure",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcp" => Ok(Provider::Gcp),
            "azure" => Ok(Provider::Azure),
            other => Err(Error::data(format!("unknown provider: {other}"))),
        }
    }
}

/// Identity of one independent cost time series:
/// (provider, service, region, currency).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityKey {
    pub provider: Provider,
    pub service: String,
    pub region: String,
    pub currency: String,
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.provider, self.service, self.region, self.currency
        )
    }
}

/// One raw billing reading as fetched from a provider export.
///
/// `conversion_rate` is the per-row currency conversion factor present in the
/// GCP multi-currency export; the Azure export carries no such field.
/// Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingObservation {
    pub provider: Provider,
    pub service: String,
    pub region: String,
    /// ISO currency code the raw amount is denominated in.
    pub source_currency: String,
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Non-negative amount in the source currency.
    pub raw_cost: f64,
    /// Embedded conversion rate to the canonical currency, if the export has one.
    pub conversion_rate: Option<f64>,
}

/// The canonical unit of stored history: one entity's cost for one day,
/// converted to the canonical accounting currency.
///
/// For a fixed entity key, dates are contiguous across the retained lookback
/// window and `time_idx` increases by exactly 1 per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCostRow {
    pub provider: Provider,
    pub service: String,
    pub region: String,
    /// Always the canonical accounting currency.
    pub currency: String,
    pub date: NaiveDate,
    /// Cost in the canonical currency, >= 0.
    pub cost: f64,
    /// Days since the window origin; aligned across entity keys.
    pub time_idx: i64,
}

impl NormalizedCostRow {
    /// The entity key this row belongs to.
    pub fn entity_key(&self) -> EntityKey {
        EntityKey {
            provider: self.provider,
            service: self.service.clone(),
            region: self.region.clone(),
            currency: self.currency.clone(),
        }
    }
}

/// Per-quantile forecast output from the model collaborator.
///
/// Maps quantile label (e.g. "0.1".."0.9") to an ordered sequence of
/// predicted daily costs. `BTreeMap` keeps labels in lexicographic order,
/// which the representative-quantile tie-break relies on. Ephemeral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantileForecast {
    pub series: BTreeMap<String, Vec<f64>>,
}

impl QuantileForecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one quantile's predicted sequence.
    pub fn insert(&mut self, label: impl Into<String>, values: Vec<f64>) {
        self.series.insert(label.into(), values);
    }

    /// True if the forecast carries no quantile labels at all.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Length of the longest predicted sequence.
    pub fn horizon(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Quantile labels in lexicographic order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

/// Weekly/monthly/yearly cost projections for one provider, plus the
/// quantile series used for display. All values are in the canonical
/// currency and non-negative. Derived 1:1 from one `QuantileForecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub provider: Provider,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
    pub quantile_series: BTreeMap<String, Vec<f64>>,
}

/// One provider's slot in the summary response: projections, or an explicit
/// unavailable marker so the schema stays stable under partial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderProjection {
    Available(ProjectionSummary),
    Unavailable { reason: String },
}

impl ProviderProjection {
    /// Mark a provider unavailable with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ProviderProjection::Unavailable {
            reason: reason.into(),
        }
    }

    /// True if projections are present.
    pub fn is_available(&self) -> bool {
        matches!(self, ProviderProjection::Available(_))
    }
}

/// Cross-provider summary response: every requested provider appears,
/// available or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub providers: BTreeMap<Provider, ProviderProjection>,
}

impl CostReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one provider's slot.
    pub fn insert(&mut self, provider: Provider, projection: ProviderProjection) {
        self.providers.insert(provider, projection);
    }

    /// Number of providers with projections available.
    pub fn available_count(&self) -> usize {
        self.providers
            .values()
            .filter(|p| p.is_available())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip() {
        for provider in Provider::ALL {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
        }
        assert_eq!("AZURE".parse::<Provider>().unwrap(), Provider::Azure);
        assert!("aws".parse::<Provider>().is_err());
    }

    #[test]
    fn test_entity_key_ordering() {
        let a = EntityKey {
            provider: Provider::Azure,
            service: "compute".into(),
            region: "eastus".into(),
            currency: "INR".into(),
        };
        let b = EntityKey {
            provider: Provider::Gcp,
            service: "compute".into(),
            region: "us-central1".into(),
            currency: "INR".into(),
        };
        // Provider is the leading sort field.
        assert!(a < b);
        assert_eq!(a.to_string(), "azure/compute/eastus/INR");
    }

    #[test]
    fn test_quantile_forecast_horizon() {
        let mut forecast = QuantileForecast::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);

        forecast.insert("0.5", vec![1.0, 2.0, 3.0]);
        forecast.insert("0.9", vec![4.0, 5.0]);
        assert_eq!(forecast.horizon(), 3);

        let labels: Vec<&str> = forecast.labels().collect();
        assert_eq!(labels, vec!["0.5", "0.9"]);
    }

    #[test]
    fn test_report_serializes_with_provider_keys() {
        let mut report = CostReport::new();
        report.insert(
            Provider::Gcp,
            ProviderProjection::unavailable("insufficient history"),
        );

        let json = serde_json::to_value(&report).unwrap();
        let slot = &json["providers"]["gcp"];
        assert_eq!(slot["status"], "unavailable");
        assert_eq!(slot["reason"], "insufficient history");
        assert_eq!(report.available_count(), 0);
    }

    #[test]
    fn test_projection_serializes_flat() {
        let projection = ProviderProjection::Available(ProjectionSummary {
            provider: Provider::Azure,
            weekly: 70.0,
            monthly: 300.0,
            yearly: 3600.0,
            quantile_series: BTreeMap::new(),
        });

        let json = serde_json::to_value(&projection).unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["weekly"], 70.0);
        assert_eq!(json["yearly"], 3600.0);
    }
}
