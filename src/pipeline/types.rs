//! Type definitions for the aggregation pipeline
//!
//! Each accumulator map is owned by exactly one consumer for the duration of
//! a run, so none of them needs interior locking. Counts only ever increase
//! while the stream is open; the maps are frozen by moving them into the
//! `RollupSet` once every queue has drained.

use std::collections::HashMap;

use crate::event::Signature;

/// Severity name to occurrence count.
pub type SeverityCounts = HashMap<String, u64>;

/// (product, version) pair to occurrence count.
pub type ProductVersionCounts = HashMap<(String, String), u64>;

/// Error signature to occurrence count.
pub type SignatureCounts = HashMap<Signature, u64>;

/// Error signature to per-hour-of-day histogram. Inner histograms are
/// created lazily, only for hours actually observed.
pub type SignatureHourHistogram = HashMap<Signature, HashMap<u8, u64>>;

/// Frozen accumulator state for one finished run, one field per rollup.
#[derive(Debug, Default)]
pub struct RollupSet {
    pub severity: SeverityCounts,
    pub product_version: ProductVersionCounts,
    pub signatures: SignatureCounts,
    pub hourly: SignatureHourHistogram,
}

/// The hour-of-day bucket with the highest observed count for one
/// signature. Derived at emission time, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakPeriod {
    pub hour: u8,
    pub count: u64,
}

impl PeakPeriod {
    /// Display label spanning `[hour, hour+1)`, wrapping at 24:
    /// hour 23 renders as `23:00 - 00:00`.
    pub fn label(&self) -> String {
        format!("{:02}:00 - {:02}:00", self.hour, (self.hour + 1) % 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_label_zero_padded() {
        let period = PeakPeriod { hour: 9, count: 4 };
        assert_eq!(period.label(), "09:00 - 10:00");
    }

    #[test]
    fn test_period_label_wraps_at_midnight() {
        let period = PeakPeriod { hour: 23, count: 1 };
        assert_eq!(period.label(), "23:00 - 00:00");
    }

    #[test]
    fn test_period_label_midnight_start() {
        let period = PeakPeriod { hour: 0, count: 7 };
        assert_eq!(period.label(), "00:00 - 01:00");
    }
}
