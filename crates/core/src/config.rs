//! Configuration structures for the cloudcost system.
//!
//! All values are read once per run and treated as immutable for its
//! duration; there is no mid-run reconfiguration.

use serde::{Deserialize, Serialize};

/// Main configuration for the billing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Currency normalization configuration.
    pub currency: CurrencyConfig,
    /// Lookback window configuration.
    pub window: WindowConfig,
    /// Forecast configuration.
    pub forecast: ForecastConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyConfig::default(),
            window: WindowConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

/// Currency normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Canonical accounting currency all costs are converted into.
    pub canonical_code: String,
    /// Static conversion rate for providers whose export carries no
    /// embedded per-row rate.
    pub fallback_rate: f64,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            canonical_code: "INR".to_string(),
            fallback_rate: 88.67,
        }
    }
}

/// Lookback window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Number of most-recent calendar days considered for normalization.
    pub lookback_days: u32,
    /// Minimum observed days an entity needs within the window to be kept.
    pub min_timesteps: usize,
    /// What to write for a day with no observation.
    pub missing_day: MissingDayPolicy,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_days: 180,
            min_timesteps: 2,
            missing_day: MissingDayPolicy::Zero,
        }
    }
}

/// Forecast configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of future days a single forecast call predicts.
    pub horizon_days: u32,
    /// Most-recent days of history handed to the model as encoder input.
    pub encoder_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            encoder_days: 30,
        }
    }
}

/// Gap-fill policy for days in the lookback window with no observation.
///
/// `Zero` is the documented default: a missing day represents no spend,
/// not missing data. This directly affects forecast training data and can
/// mask reporting outages versus true zero spend, which is why it is a
/// named policy rather than an implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDayPolicy {
    /// Missing day means no spend: fill with cost 0.
    Zero,
    /// Repeat the last observed cost (0 if none seen yet).
    CarryForward,
    /// Emit no row for the missing day, leaving the series shorter.
    Exclude,
}

impl MissingDayPolicy {
    /// Cost to synthesize for a missing day, given the last observed cost
    /// in the series so far. `None` means the day is skipped entirely.
    pub fn fill(self, last_observed: Option<f64>) -> Option<f64> {
        match self {
            MissingDayPolicy::Zero => Some(0.0),
            MissingDayPolicy::CarryForward => Some(last_observed.unwrap_or(0.0)),
            MissingDayPolicy::Exclude => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.currency.canonical_code, "INR");
        assert_eq!(config.currency.fallback_rate, 88.67);
        assert_eq!(config.window.lookback_days, 180);
        assert_eq!(config.window.min_timesteps, 2);
        assert_eq!(config.window.missing_day, MissingDayPolicy::Zero);
        assert_eq!(config.forecast.horizon_days, 7);
        assert_eq!(config.forecast.encoder_days, 30);
    }

    #[test]
    fn test_missing_day_policies() {
        assert_eq!(MissingDayPolicy::Zero.fill(Some(42.0)), Some(0.0));
        assert_eq!(MissingDayPolicy::CarryForward.fill(Some(42.0)), Some(42.0));
        assert_eq!(MissingDayPolicy::CarryForward.fill(None), Some(0.0));
        assert_eq!(MissingDayPolicy::Exclude.fill(Some(42.0)), None);
    }
}
