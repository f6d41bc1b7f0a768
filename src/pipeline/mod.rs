//! Concurrent aggregation pipeline
//!
//! Fan-out/fan-in over a single pass of the record source: the dispatcher
//! forwards a copy of each record to every aggregator's queue, four consumer
//! threads drain their queues into exclusively-owned accumulators, and the
//! driver joins all of them before the report stage runs.
//!
//! # Module Structure
//!
//! - `types`: accumulator maps, the frozen snapshot, peak periods
//! - `dispatcher`: single-pass fan-out with close-to-signal-completion
//! - `aggregate`: the `Rollup` rule trait, the four aggregators, the drain loop
//! - `processor`: thread spawning, completion barrier, snapshot assembly

mod aggregate;
mod dispatcher;
mod processor;
mod types;

// Re-export public types
pub use aggregate::{
    HourlyPeakAggregator, ProductVersionAggregator, Rollup, SeverityAggregator,
    SignatureAggregator,
};
pub use processor::{run_pipeline, PipelineRun};
pub use types::{
    PeakPeriod, ProductVersionCounts, RollupSet, SeverityCounts, SignatureCounts,
    SignatureHourHistogram,
};
