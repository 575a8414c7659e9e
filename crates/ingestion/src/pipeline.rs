//! End-to-end ingest: raw provider observations to persisted rows.
//!
//! Currency normalization and series building are pure; the only side
//! effect is the final `CostStore` upsert, so re-running a day is safe.

use chrono::NaiveDate;
use cloudcost_core::{BillingObservation, Config, EntityKey, NormalizedCostRow, Result};
use cloudcost_store::CostStore;
use tracing::{info, warn};

use crate::currency::CurrencyNormalizer;
use crate::series::{NormalizedObservation, SeriesBuilder};

/// Label substituted for blank service or region fields.
const UNKNOWN: &str = "unknown";

/// Normalized rows ready to persist, plus what was dropped along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub rows: Vec<NormalizedCostRow>,
    pub observations_dropped: usize,
    pub entities_excluded: usize,
}

/// Counters from one completed ingest run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub rows_written: usize,
    pub observations_dropped: usize,
    pub entities_excluded: usize,
}

/// Combines currency normalization and series building, writing the result
/// through a `CostStore`.
pub struct IngestPipeline {
    normalizer: CurrencyNormalizer,
    builder: SeriesBuilder,
}

impl IngestPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            normalizer: CurrencyNormalizer::new(&config.currency),
            builder: SeriesBuilder::new(&config.window),
        }
    }

    /// Normalize raw observations into gap-free rows without persisting.
    ///
    /// Observations with invalid conversion input or a negative raw cost
    /// are dropped with a warning; one bad observation never blocks the
    /// rest of the run.
    pub fn normalize(
        &self,
        observations: &[BillingObservation],
        as_of: NaiveDate,
    ) -> NormalizedBatch {
        let mut normalized = Vec::with_capacity(observations.len());
        let mut dropped = 0usize;

        for obs in observations {
            if obs.raw_cost < 0.0 {
                warn!(
                    provider = %obs.provider,
                    service = %obs.service,
                    date = %obs.date,
                    raw_cost = obs.raw_cost,
                    "dropping observation with negative raw cost"
                );
                dropped += 1;
                continue;
            }

            match self.normalizer.normalize(obs) {
                Ok(cost) => normalized.push(NormalizedObservation {
                    key: self.entity_key_for(obs),
                    date: obs.date,
                    cost,
                }),
                Err(err) => {
                    warn!(%err, "dropping observation");
                    dropped += 1;
                }
            }
        }

        let outcome = self.builder.build(&normalized, as_of);
        NormalizedBatch {
            rows: outcome.rows,
            observations_dropped: dropped,
            entities_excluded: outcome.entities_excluded,
        }
    }

    /// Run a full ingest: normalize and upsert through the store.
    ///
    /// Store failures propagate to the caller, which owns retry policy;
    /// the keyed upsert makes a full-batch retry safe.
    pub fn run(
        &self,
        observations: &[BillingObservation],
        as_of: NaiveDate,
        store: &mut dyn CostStore,
    ) -> Result<IngestReport> {
        let batch = self.normalize(observations, as_of);
        let rows_written = store.upsert(&batch.rows)?;

        info!(
            rows_written,
            observations_dropped = batch.observations_dropped,
            entities_excluded = batch.entities_excluded,
            "ingest run complete"
        );

        Ok(IngestReport {
            rows_written,
            observations_dropped: batch.observations_dropped,
            entities_excluded: batch.entities_excluded,
        })
    }

    fn entity_key_for(&self, obs: &BillingObservation) -> EntityKey {
        EntityKey {
            provider: obs.provider,
            service: or_unknown(&obs.service),
            region: or_unknown(&obs.region),
            currency: self.normalizer.canonical_code().to_string(),
        }
    }
}

fn or_unknown(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudcost_core::{Error, Provider};
    use cloudcost_store::SqliteCostStore;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn make_obs(provider: Provider, day: u32, raw_cost: f64, rate: Option<f64>) -> BillingObservation {
        BillingObservation {
            provider,
            service: "compute".to_string(),
            region: "us-central1".to_string(),
            source_currency: "USD".to_string(),
            date: date(day),
            raw_cost,
            conversion_rate: rate,
        }
    }

    fn small_window_config() -> Config {
        let mut config = Config::default();
        config.window.lookback_days = 5;
        config
    }

    #[test]
    fn test_normalize_converts_and_fills() {
        let pipeline = IngestPipeline::new(&small_window_config());
        let observations = vec![
            make_obs(Provider::Gcp, 1, 2.0, Some(80.0)),
            make_obs(Provider::Gcp, 3, 1.0, Some(80.0)),
        ];

        let batch = pipeline.normalize(&observations, date(5));

        assert_eq!(batch.rows.len(), 5);
        assert_eq!(batch.observations_dropped, 0);
        assert!((batch.rows[0].cost - 160.0).abs() < 1e-10);
        assert!((batch.rows[2].cost - 80.0).abs() < 1e-10);
        assert_eq!(batch.rows[0].currency, "INR");
    }

    #[test]
    fn test_invalid_rate_drops_only_that_observation() {
        let pipeline = IngestPipeline::new(&small_window_config());
        let observations = vec![
            make_obs(Provider::Gcp, 1, 2.0, None), // missing rate
            make_obs(Provider::Azure, 1, 1.0, None),
            make_obs(Provider::Azure, 2, 1.0, None),
        ];

        let batch = pipeline.normalize(&observations, date(5));

        assert_eq!(batch.observations_dropped, 1);
        // The Azure entity survives with the static rate applied.
        assert_eq!(batch.rows.len(), 5);
        assert!(batch.rows.iter().all(|r| r.provider == Provider::Azure));
    }

    #[test]
    fn test_negative_raw_cost_dropped() {
        let pipeline = IngestPipeline::new(&small_window_config());
        let observations = vec![
            make_obs(Provider::Azure, 1, -5.0, None),
            make_obs(Provider::Azure, 1, 1.0, None),
            make_obs(Provider::Azure, 2, 1.0, None),
        ];

        let batch = pipeline.normalize(&observations, date(5));

        assert_eq!(batch.observations_dropped, 1);
        assert!(batch.rows.iter().all(|r| r.cost >= 0.0));
    }

    #[test]
    fn test_blank_fields_normalize_to_unknown() {
        let pipeline = IngestPipeline::new(&small_window_config());
        let mut blank = make_obs(Provider::Azure, 1, 1.0, None);
        blank.service = "".to_string();
        blank.region = "  ".to_string();
        let mut second = make_obs(Provider::Azure, 2, 1.0, None);
        second.service = "".to_string();
        second.region = "".to_string();

        let batch = pipeline.normalize(&[blank, second], date(5));

        assert!(!batch.rows.is_empty());
        assert!(batch.rows.iter().all(|r| r.service == "unknown"));
        assert!(batch.rows.iter().all(|r| r.region == "unknown"));
    }

    #[test]
    fn test_run_persists_rows() {
        let pipeline = IngestPipeline::new(&small_window_config());
        let mut store = SqliteCostStore::open_in_memory().unwrap();
        let observations = vec![
            make_obs(Provider::Gcp, 1, 2.0, Some(80.0)),
            make_obs(Provider::Gcp, 3, 1.0, Some(80.0)),
        ];

        let report = pipeline.run(&observations, date(5), &mut store).unwrap();

        assert_eq!(report.rows_written, 5);
        let read = store.read_recent(Provider::Gcp, 5, date(5)).unwrap();
        assert_eq!(read.len(), 5);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let pipeline = IngestPipeline::new(&small_window_config());
        let mut store = SqliteCostStore::open_in_memory().unwrap();
        let observations = vec![
            make_obs(Provider::Gcp, 1, 2.0, Some(80.0)),
            make_obs(Provider::Gcp, 3, 1.0, Some(80.0)),
        ];

        let first = pipeline.run(&observations, date(5), &mut store).unwrap();
        let second = pipeline.run(&observations, date(5), &mut store).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.row_count().unwrap(), 5);
    }

    #[test]
    fn test_store_failure_propagates() {
        struct FailingStore;

        impl CostStore for FailingStore {
            fn upsert(&mut self, _rows: &[NormalizedCostRow]) -> cloudcost_core::Result<usize> {
                Err(Error::database("disk full"))
            }

            fn read_recent(
                &self,
                _provider: Provider,
                _lookback_days: u32,
                _as_of: NaiveDate,
            ) -> cloudcost_core::Result<Vec<NormalizedCostRow>> {
                Ok(Vec::new())
            }
        }

        let pipeline = IngestPipeline::new(&small_window_config());
        let observations = vec![
            make_obs(Provider::Azure, 1, 1.0, None),
            make_obs(Provider::Azure, 2, 1.0, None),
        ];

        let err = pipeline
            .run(&observations, date(5), &mut FailingStore)
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
