//! Ranking, selection, and CSV report emission
//!
//! Runs strictly after the pipeline's completion barrier, over frozen
//! accumulator state. All orderings are total: count descending, then the
//! key lexicographically ascending, so two runs over the same input emit
//! byte-identical report bodies. Peak-hour ties go to the lowest hour.

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::event::Signature;
use crate::pipeline::{
    PeakPeriod, ProductVersionCounts, RollupSet, SeverityCounts, SignatureCounts,
    SignatureHourHistogram,
};

pub const SEVERITY_REPORT: &str = "severity_report";
pub const PRODUCT_VERSION_REPORT: &str = "product_version_report";
pub const SIGNATURE_REPORT: &str = "signature_report";
pub const HOURLY_PEAK_REPORT: &str = "hourly_peak_report";

/// Full severity listing, count descending, name ascending on ties.
pub fn ranked_severities(counts: &SeverityCounts) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Full (product, version) listing, count descending, pair ascending on ties.
pub fn ranked_product_versions(counts: &ProductVersionCounts) -> Vec<((String, String), u64)> {
    let mut rows: Vec<((String, String), u64)> =
        counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Signature listing truncated to the `top` highest counts, signature
/// ascending on ties.
pub fn ranked_signatures(counts: &SignatureCounts, top: usize) -> Vec<(Signature, u64)> {
    let mut rows: Vec<(Signature, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(top);
    rows
}

/// For every signature in the histogram, the hour bucket with the maximum
/// count. Equal bucket counts resolve to the lowest hour. Rows come back
/// sorted by peak count descending, signature ascending on ties.
pub fn signature_peaks(histogram: &SignatureHourHistogram) -> Vec<(Signature, PeakPeriod)> {
    let mut rows: Vec<(Signature, PeakPeriod)> = histogram
        .iter()
        .filter_map(|(signature, hours)| {
            hours
                .iter()
                .map(|(hour, count)| PeakPeriod {
                    hour: *hour,
                    count: *count,
                })
                // Highest count wins; among equal counts the lowest hour
                // compares greatest, so max_by picks it.
                .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.hour.cmp(&a.hour)))
                .map(|peak| (signature.clone(), peak))
        })
        .collect();
    rows.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Writes the four rollup reports for one finished run.
///
/// All four files share one run stamp with seconds resolution, so a run's
/// artifacts sort together. Each report owns its file handle only while
/// writing that report; a failure on one does not stop the others from
/// being attempted.
pub struct ReportWriter {
    output_dir: PathBuf,
    run_stamp: String,
}

impl ReportWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P, run_stamp: String) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            run_stamp,
        }
    }

    /// Stamp the writer with the current local time, `%Y%m%d_%H%M%S`.
    pub fn with_current_stamp<P: AsRef<Path>>(output_dir: P) -> Self {
        let run_stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::new(output_dir, run_stamp)
    }

    pub fn report_path(&self, report_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", report_name, self.run_stamp))
    }

    /// Write all four reports, attempting each one even if an earlier one
    /// failed. Returns the written paths, or an error naming every report
    /// that could not be written.
    pub fn write_all(&self, rollups: &RollupSet, top_signatures: usize) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "failed to create output directory '{}'",
                self.output_dir.display()
            )
        })?;

        let results = [
            self.write_severity(&rollups.severity),
            self.write_product_versions(&rollups.product_version),
            self.write_signatures(&rollups.signatures, top_signatures),
            self.write_hourly_peaks(&rollups.hourly),
        ];

        let mut written = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(path) => written.push(path),
                Err(e) => failures.push(format!("{:#}", e)),
            }
        }

        if !failures.is_empty() {
            bail!(
                "failed to write {} of 4 reports: {}",
                failures.len(),
                failures.join("; ")
            );
        }

        Ok(written)
    }

    fn write_severity(&self, counts: &SeverityCounts) -> Result<PathBuf> {
        let path = self.report_path(SEVERITY_REPORT);
        let mut wtr = self.open(&path)?;

        wtr.write_record(["Severity", "Count"])?;
        for (severity, count) in ranked_severities(counts) {
            wtr.write_record([severity.as_str(), &count.to_string()])?;
        }

        wtr.flush()?;
        Ok(path)
    }

    fn write_product_versions(&self, counts: &ProductVersionCounts) -> Result<PathBuf> {
        let path = self.report_path(PRODUCT_VERSION_REPORT);
        let mut wtr = self.open(&path)?;

        wtr.write_record(["Product", "Version", "Count"])?;
        for ((product, version), count) in ranked_product_versions(counts) {
            wtr.write_record([product.as_str(), version.as_str(), &count.to_string()])?;
        }

        wtr.flush()?;
        Ok(path)
    }

    fn write_signatures(&self, counts: &SignatureCounts, top: usize) -> Result<PathBuf> {
        let path = self.report_path(SIGNATURE_REPORT);
        let mut wtr = self.open(&path)?;

        wtr.write_record(["Product", "Severity", "ErrorCode", "Count"])?;
        for (signature, count) in ranked_signatures(counts, top) {
            wtr.write_record([
                signature.product.as_str(),
                signature.severity.as_str(),
                signature.error_code.as_str(),
                &count.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(path)
    }

    fn write_hourly_peaks(&self, histogram: &SignatureHourHistogram) -> Result<PathBuf> {
        let path = self.report_path(HOURLY_PEAK_REPORT);
        let mut wtr = self.open(&path)?;

        wtr.write_record(["Period", "Product", "Severity", "ErrorCode", "Count"])?;
        for (signature, peak) in signature_peaks(histogram) {
            wtr.write_record([
                peak.label().as_str(),
                signature.product.as_str(),
                signature.severity.as_str(),
                signature.error_code.as_str(),
                &peak.count.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(path)
    }

    fn open(&self, path: &Path) -> Result<csv::Writer<fs::File>> {
        csv::Writer::from_path(path)
            .with_context(|| format!("failed to create report file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn signature(product: &str, severity: &str, code: &str) -> Signature {
        Signature {
            product: product.to_string(),
            severity: severity.to_string(),
            error_code: code.to_string(),
        }
    }

    #[test]
    fn test_severity_ranking_count_desc_then_name() {
        let counts: SeverityCounts = [
            ("Warning".to_string(), 5),
            ("Critical".to_string(), 5),
            ("Info".to_string(), 9),
        ]
        .into_iter()
        .collect();

        let ranked = ranked_severities(&counts);
        assert_eq!(
            ranked,
            vec![
                ("Info".to_string(), 9),
                ("Critical".to_string(), 5),
                ("Warning".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_signature_ranking_truncates() {
        let counts: SignatureCounts = (0..15)
            .map(|i| (signature("Foo", "Critical", &format!("E{:02}", i)), i as u64))
            .collect();

        let ranked = ranked_signatures(&counts, 10);
        assert_eq!(ranked.len(), 10);
        // Non-increasing by count
        for pair in ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_peak_selection_takes_max_hour_bucket() {
        let mut hours = HashMap::new();
        hours.insert(10u8, 4u64);
        hours.insert(14u8, 9u64);
        hours.insert(23u8, 1u64);
        let mut histogram: SignatureHourHistogram = HashMap::new();
        histogram.insert(signature("Foo", "Critical", "E1"), hours);

        let peaks = signature_peaks(&histogram);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].1, PeakPeriod { hour: 14, count: 9 });
    }

    #[test]
    fn test_peak_tie_goes_to_lowest_hour() {
        let mut hours = HashMap::new();
        hours.insert(22u8, 3u64);
        hours.insert(7u8, 3u64);
        hours.insert(15u8, 3u64);
        let mut histogram: SignatureHourHistogram = HashMap::new();
        histogram.insert(signature("Foo", "Critical", "E1"), hours);

        let peaks = signature_peaks(&histogram);
        assert_eq!(peaks[0].1, PeakPeriod { hour: 7, count: 3 });
    }

    #[test]
    fn test_peaks_sorted_by_count_desc() {
        let mut histogram: SignatureHourHistogram = HashMap::new();
        histogram.insert(
            signature("Foo", "Critical", "E1"),
            [(10u8, 2u64)].into_iter().collect(),
        );
        histogram.insert(
            signature("Bar", "Warning", "E2"),
            [(14u8, 7u64)].into_iter().collect(),
        );

        let peaks = signature_peaks(&histogram);
        assert_eq!(peaks[0].0.product, "Bar");
        assert_eq!(peaks[1].0.product, "Foo");
    }

    #[test]
    fn test_report_filenames_embed_stamp() {
        let writer = ReportWriter::new("out", "20240301_101500".to_string());
        assert_eq!(
            writer.report_path(SEVERITY_REPORT),
            PathBuf::from("out/severity_report_20240301_101500.csv")
        );
    }

    #[test]
    fn test_write_all_creates_dir_and_four_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let writer = ReportWriter::new(&nested, "20240301_101500".to_string());

        let written = writer.write_all(&RollupSet::default(), 10).unwrap();
        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists());
            let content = fs::read_to_string(path).unwrap();
            // Empty rollups produce header-only reports
            assert_eq!(content.lines().count(), 1);
        }
    }

    #[test]
    fn test_fields_with_delimiter_are_quoted() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "20240301_101500".to_string());

        let mut rollups = RollupSet::default();
        rollups.severity.insert("odd, severity".to_string(), 2);
        writer.write_all(&rollups, 10).unwrap();

        let content =
            fs::read_to_string(writer.report_path(SEVERITY_REPORT)).unwrap();
        assert!(content.contains("\"odd, severity\",2"));

        // Reading the row back splits into exactly two columns
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(0), Some("odd, severity"));
    }
}
