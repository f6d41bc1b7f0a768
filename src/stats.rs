use serde::Serialize;
use std::time::Instant;

/// Statistics collected during one aggregation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    pub records_read: usize,
    pub malformed_records: usize,
    pub missing_timestamps: usize,
    pub reports_written: usize,
    pub elapsed_ms: u64,
    #[serde(skip)]
    start_time: Option<Instant>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Freeze the elapsed time. Call once, after the last report is written.
    pub fn finish(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed_ms = start.elapsed().as_millis() as u64;
        }
    }

    pub fn format_stats(&self) -> String {
        let mut output = format!("Records processed: {} total", self.records_read);

        if self.malformed_records > 0 {
            output.push_str(&format!(", {} malformed", self.malformed_records));
        }
        if self.missing_timestamps > 0 {
            output.push_str(&format!(
                ", {} without timestamp",
                self.missing_timestamps
            ));
        }

        output.push_str(&format!(
            "; {} reports written in {}ms",
            self.reports_written, self.elapsed_ms
        ));

        if self.elapsed_ms > 0 && self.records_read > 0 {
            let records_per_sec = (self.records_read as f64 * 1000.0) / self.elapsed_ms as f64;
            output.push_str(&format!(" ({:.0} records/s)", records_per_sec));
        }

        output
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| "Error serializing statistics".to_string())
    }
}
