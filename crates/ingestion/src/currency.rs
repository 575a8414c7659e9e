//! Currency normalization into the canonical accounting currency.
//!
//! One provider's billing export embeds a per-row conversion rate (GCP);
//! the other carries no such field and uses a configured static rate
//! (Azure). The rule is a strategy selected by provider so a new provider
//! can plug in its own conversion source without touching the rest of the
//! engine.

use std::collections::HashMap;

use cloudcost_core::config::CurrencyConfig;
use cloudcost_core::{BillingObservation, Error, Provider, Result};

/// Source of the conversion rate for one observation.
///
/// Implementations must be pure functions of the observation, so that
/// re-running ingestion for the same historical day is idempotent.
pub trait ConversionStrategy {
    /// Conversion rate from the observation's source currency to the
    /// canonical currency.
    fn rate(&self, obs: &BillingObservation) -> Result<f64>;
}

/// Reads the conversion rate embedded in the observation itself.
///
/// Used for the GCP multi-currency export, where every row carries its own
/// conversion factor.
pub struct EmbeddedRate;

impl ConversionStrategy for EmbeddedRate {
    fn rate(&self, obs: &BillingObservation) -> Result<f64> {
        match obs.conversion_rate {
            Some(rate) if rate > 0.0 => Ok(rate),
            Some(rate) => Err(Error::invalid_rate(
                obs.provider,
                &obs.source_currency,
                format!("non-positive embedded rate {rate}"),
            )),
            None => Err(Error::invalid_rate(
                obs.provider,
                &obs.source_currency,
                "missing embedded rate",
            )),
        }
    }
}

/// Applies a single configured rate to every observation.
///
/// Used for the Azure export, which has no per-row conversion field.
pub struct StaticRate {
    rate: f64,
}

impl StaticRate {
    /// Create a static-rate strategy.
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl ConversionStrategy for StaticRate {
    fn rate(&self, obs: &BillingObservation) -> Result<f64> {
        if self.rate > 0.0 {
            Ok(self.rate)
        } else {
            Err(Error::invalid_rate(
                obs.provider,
                &obs.source_currency,
                format!("non-positive configured rate {}", self.rate),
            ))
        }
    }
}

/// Converts raw monetary amounts into the canonical accounting currency,
/// selecting the conversion strategy by provider.
pub struct CurrencyNormalizer {
    canonical_code: String,
    strategies: HashMap<Provider, Box<dyn ConversionStrategy>>,
}

impl CurrencyNormalizer {
    /// Create a normalizer with the default per-provider strategies:
    /// GCP reads the embedded rate, Azure uses the configured fallback.
    pub fn new(config: &CurrencyConfig) -> Self {
        let mut strategies: HashMap<Provider, Box<dyn ConversionStrategy>> = HashMap::new();
        strategies.insert(Provider::Gcp, Box::new(EmbeddedRate));
        strategies.insert(
            Provider::Azure,
            Box::new(StaticRate::new(config.fallback_rate)),
        );

        Self {
            canonical_code: config.canonical_code.clone(),
            strategies,
        }
    }

    /// Replace the conversion strategy for one provider.
    pub fn with_strategy(
        mut self,
        provider: Provider,
        strategy: Box<dyn ConversionStrategy>,
    ) -> Self {
        self.strategies.insert(provider, strategy);
        self
    }

    /// The canonical currency code amounts are converted into.
    pub fn canonical_code(&self) -> &str {
        &self.canonical_code
    }

    /// Convert one observation's raw amount into the canonical currency.
    ///
    /// Fails with `InvalidRate` if the required rate is missing or
    /// non-positive; the caller drops the observation, it is never
    /// silently zeroed.
    pub fn normalize(&self, obs: &BillingObservation) -> Result<f64> {
        let strategy = self.strategies.get(&obs.provider).ok_or_else(|| {
            Error::invalid_rate(
                obs.provider,
                &obs.source_currency,
                "no conversion strategy registered",
            )
        })?;

        let rate = strategy.rate(obs)?;
        Ok(obs.raw_cost * rate)
    }
}
