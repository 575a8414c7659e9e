//! Cross-provider summary assembly.
//!
//! Folds per-provider outcomes into one response in which every requested
//! provider appears: with projections, or with an explicit unavailable
//! marker so the boundary layer can render a stable schema regardless of
//! partial data availability.

use cloudcost_core::{CostReport, Error, ProjectionSummary, Provider, ProviderProjection, Result};
use tracing::warn;

/// Stateless assembler of per-provider outcomes into a `CostReport`.
pub struct SummaryAssembler;

impl SummaryAssembler {
    /// Assemble outcomes into a report. Failed providers are included with
    /// an unavailable marker, never omitted.
    pub fn assemble(
        outcomes: impl IntoIterator<Item = (Provider, Result<ProjectionSummary>)>,
    ) -> CostReport {
        let mut report = CostReport::new();
        for (provider, outcome) in outcomes {
            let slot = match outcome {
                Ok(summary) => ProviderProjection::Available(summary),
                Err(err) => {
                    warn!(%provider, %err, "provider summary unavailable");
                    ProviderProjection::unavailable(unavailable_reason(&err))
                }
            };
            report.insert(provider, slot);
        }
        report
    }
}

/// Stable, user-facing reason strings per failure class.
fn unavailable_reason(err: &Error) -> String {
    match err {
        Error::EmptyForecast => "no forecast available".to_string(),
        Error::InsufficientHistory { .. } => "insufficient history".to_string(),
        Error::Database(_) => "cost history unavailable".to_string(),
        Error::Collaborator(_) => "forecast model unavailable".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(provider: Provider) -> ProjectionSummary {
        ProjectionSummary {
            provider,
            weekly: 7.0,
            monthly: 30.0,
            yearly: 360.0,
            quantile_series: BTreeMap::new(),
        }
    }

    #[test]
    fn test_every_provider_appears() {
        let report = SummaryAssembler::assemble(vec![
            (Provider::Gcp, Ok(summary(Provider::Gcp))),
            (Provider::Azure, Err(Error::EmptyForecast)),
        ]);

        assert_eq!(report.providers.len(), 2);
        assert_eq!(report.available_count(), 1);
        assert!(report.providers[&Provider::Gcp].is_available());
        assert_eq!(
            report.providers[&Provider::Azure],
            ProviderProjection::unavailable("no forecast available")
        );
    }

    #[test]
    fn test_failure_reasons_are_stable() {
        let cases = vec![
            (Error::EmptyForecast, "no forecast available"),
            (
                Error::insufficient_history("gcp", 1, 2),
                "insufficient history",
            ),
            (Error::database("disk full"), "cost history unavailable"),
            (
                Error::collaborator(anyhow::anyhow!("timeout")),
                "forecast model unavailable",
            ),
        ];

        for (err, expected) in cases {
            let report = SummaryAssembler::assemble(vec![(Provider::Gcp, Err(err))]);
            assert_eq!(
                report.providers[&Provider::Gcp],
                ProviderProjection::unavailable(expected)
            );
        }
    }
}
