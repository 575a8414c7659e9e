//! The upsert-store collaborator contract.

use chrono::NaiveDate;
use cloudcost_core::{NormalizedCostRow, Provider, Result};

/// Durable keyed storage for normalized daily cost rows.
///
/// Upserts are keyed on (provider, service, region, currency, date): a
/// re-run for the same day overwrites, never duplicates, so retrying a
/// full batch after a mid-batch failure is safe. The engine depends on
/// collaborating stores only through this contract; retry/backoff policy
/// belongs to the caller, not to implementations.
pub trait CostStore {
    /// Write a batch of rows, overwriting any existing row with the same
    /// natural key. Returns the number of rows written.
    fn upsert(&mut self, rows: &[NormalizedCostRow]) -> Result<usize>;

    /// Read all rows for `provider` whose date falls within the
    /// `lookback_days`-day window ending at `as_of` (inclusive), sorted by
    /// date ascending with an entity-key tiebreak.
    fn read_recent(
        &self,
        provider: Provider,
        lookback_days: u32,
        as_of: NaiveDate,
    ) -> Result<Vec<NormalizedCostRow>>;
}
