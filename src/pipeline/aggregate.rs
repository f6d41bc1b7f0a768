//! The four rollup accumulators and their shared consumer loop
//!
//! Every aggregator has the same shape: a single consumer drains its queue
//! until the dispatcher closes it, applies one accumulation rule per record,
//! and is then frozen by moving its map out. Exactly one consumer owns each
//! accumulator, so there is no locking anywhere in this module.

use crossbeam_channel::Receiver;
use std::sync::Arc;

use crate::event::ErrorEvent;

use super::types::{
    ProductVersionCounts, SeverityCounts, SignatureCounts, SignatureHourHistogram,
};

/// One accumulation rule, applied once per record by a single consumer.
pub trait Rollup {
    fn absorb(&mut self, event: &ErrorEvent);
}

/// Counts records per severity name.
#[derive(Debug, Default)]
pub struct SeverityAggregator {
    counts: SeverityCounts,
}

impl SeverityAggregator {
    pub fn into_counts(self) -> SeverityCounts {
        self.counts
    }
}

impl Rollup for SeverityAggregator {
    fn absorb(&mut self, event: &ErrorEvent) {
        *self.counts.entry(event.severity.clone()).or_insert(0) += 1;
    }
}

/// Counts records per (product, version) pair.
#[derive(Debug, Default)]
pub struct ProductVersionAggregator {
    counts: ProductVersionCounts,
}

impl ProductVersionAggregator {
    pub fn into_counts(self) -> ProductVersionCounts {
        self.counts
    }
}

impl Rollup for ProductVersionAggregator {
    fn absorb(&mut self, event: &ErrorEvent) {
        *self
            .counts
            .entry((event.product.clone(), event.version.clone()))
            .or_insert(0) += 1;
    }
}

/// Counts records per error signature.
#[derive(Debug, Default)]
pub struct SignatureAggregator {
    counts: SignatureCounts,
}

impl SignatureAggregator {
    pub fn into_counts(self) -> SignatureCounts {
        self.counts
    }
}

impl Rollup for SignatureAggregator {
    fn absorb(&mut self, event: &ErrorEvent) {
        *self.counts.entry(event.signature()).or_insert(0) += 1;
    }
}

/// Builds a per-signature hour-of-day histogram. Records without a usable
/// timestamp carry no hour and are skipped by this rollup only.
#[derive(Debug, Default)]
pub struct HourlyPeakAggregator {
    histogram: SignatureHourHistogram,
}

impl HourlyPeakAggregator {
    pub fn into_histogram(self) -> SignatureHourHistogram {
        self.histogram
    }
}

impl Rollup for HourlyPeakAggregator {
    fn absorb(&mut self, event: &ErrorEvent) {
        let Some(hour) = event.hour() else {
            return;
        };
        *self
            .histogram
            .entry(event.signature())
            .or_default()
            .entry(hour)
            .or_insert(0) += 1;
    }
}

/// Drain one aggregator's queue until it is closed and empty, then hand the
/// accumulator back. Runs on the aggregator's own thread; `recv` blocks
/// while the queue is empty and returns `Err` once the dispatcher has
/// dropped the matching sender.
pub(crate) fn drain<R: Rollup>(receiver: Receiver<Arc<ErrorEvent>>, mut rollup: R) -> R {
    while let Ok(event) = receiver.recv() {
        rollup.absorb(&event);
    }
    rollup
}
