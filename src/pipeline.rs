//! Fetch, aggregate and report in one call.

use tracing::info;

use crate::error::PipelineError;
use crate::output::Reporter;
use crate::source::DataSource;
use crate::stats::Summary;

/// Fetches one collection from `source`, aggregates it and hands the result to `reporter`.
///
/// The summary is returned as well so callers can inspect it after reporting.
#[tracing::instrument(skip_all)]
pub async fn run<S, R>(source: &S, reporter: &mut R) -> Result<Summary, PipelineError>
where
    S: DataSource + ?Sized,
    R: Reporter + ?Sized,
{
    let collection = source.fetch().await?;
    let summary = Summary::from_collection(&collection)?;

    info!(
        count = summary.count,
        peak = summary.peak.as_ref().map(|p| p.magnitude),
        years = summary.yearly.len(),
        "Aggregation complete"
    );

    reporter.report(&summary).map_err(PipelineError::Report)?;
    Ok(summary)
}
