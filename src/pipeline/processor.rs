//! Pipeline orchestration: spawn, dispatch, join, freeze

use anyhow::{anyhow, Result};
use crossbeam_channel::unbounded;
use std::thread;

use crate::event::ErrorEvent;

use super::aggregate::{
    drain, HourlyPeakAggregator, ProductVersionAggregator, SeverityAggregator,
    SignatureAggregator,
};
use super::dispatcher::dispatch;
use super::types::RollupSet;

/// Result of one pipeline run: the frozen accumulators plus how many
/// records were fanned out.
#[derive(Debug)]
pub struct PipelineRun {
    pub rollups: RollupSet,
    pub records_dispatched: usize,
}

/// Run the fan-out/fan-in pipeline over a record source.
///
/// One consumer thread per aggregator; the dispatcher runs on the calling
/// thread and closes every queue by dropping the senders when the source is
/// exhausted. All four consumers are joined before this function returns,
/// so the caller can never observe a partially-populated accumulator. The
/// queues are unbounded, which is an accepted tradeoff for a finite batch
/// job and unsuitable for endless streams.
pub fn run_pipeline<I>(source: I) -> Result<PipelineRun>
where
    I: IntoIterator<Item = Result<ErrorEvent>>,
{
    let (severity_tx, severity_rx) = unbounded();
    let (product_version_tx, product_version_rx) = unbounded();
    let (signature_tx, signature_rx) = unbounded();
    let (hourly_tx, hourly_rx) = unbounded();

    let severity_handle =
        thread::spawn(move || drain(severity_rx, SeverityAggregator::default()));
    let product_version_handle =
        thread::spawn(move || drain(product_version_rx, ProductVersionAggregator::default()));
    let signature_handle =
        thread::spawn(move || drain(signature_rx, SignatureAggregator::default()));
    let hourly_handle = thread::spawn(move || drain(hourly_rx, HourlyPeakAggregator::default()));

    // Senders move into the dispatcher and are dropped inside it, closing
    // every queue whether the source ended cleanly or not.
    let dispatch_result = dispatch(
        source,
        vec![severity_tx, product_version_tx, signature_tx, hourly_tx],
    );

    // Hard join: the report stage must never race a draining consumer.
    let severity = severity_handle
        .join()
        .map_err(|_| anyhow!("severity aggregator thread panicked"))?;
    let product_version = product_version_handle
        .join()
        .map_err(|_| anyhow!("product-version aggregator thread panicked"))?;
    let signature = signature_handle
        .join()
        .map_err(|_| anyhow!("signature aggregator thread panicked"))?;
    let hourly = hourly_handle
        .join()
        .map_err(|_| anyhow!("hourly-peak aggregator thread panicked"))?;

    // Only after every consumer has settled: a source failure fails the
    // whole run and no snapshot leaves this function.
    let records_dispatched = dispatch_result?;

    Ok(PipelineRun {
        rollups: RollupSet {
            severity: severity.into_counts(),
            product_version: product_version.into_counts(),
            signatures: signature.into_counts(),
            hourly: hourly.into_histogram(),
        },
        records_dispatched,
    })
}
