//! The run boundary: one call in, one success/failure outcome out

use anyhow::{anyhow, Context, Result};

use crate::config::{StatsFormat, TallyConfig};
use crate::decompression::open_input;
use crate::error_handling::ParseReporter;
use crate::parsers::EventReader;
use crate::pipeline::run_pipeline;
use crate::reports::ReportWriter;
use crate::stats::ProcessingStats;

/// Outcome of one aggregation run, as seen by whatever triggered it. The
/// trigger surface only gets a boolean and a human-readable message; every
/// internal error collapses into that.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub success: bool,
    pub message: String,
}

/// Run one aggregation over the configured input file. Never panics on bad
/// input; an unreadable or unconfigured input becomes a failed outcome with
/// nothing written to disk.
pub fn run(config: &TallyConfig) -> RunOutcome {
    match execute(config) {
        Ok(message) => RunOutcome {
            success: true,
            message,
        },
        Err(e) => RunOutcome {
            success: false,
            message: format!("{:#}", e),
        },
    }
}

fn execute(config: &TallyConfig) -> Result<String> {
    let mut stats = ProcessingStats::new();

    let input_path = config
        .input
        .file
        .as_ref()
        .ok_or_else(|| anyhow!("no input file configured"))?;

    // Opening the input is the input-unavailable gate: nothing is created
    // on disk unless this succeeds.
    let reader = open_input(input_path)
        .with_context(|| format!("cannot read input file '{}'", input_path.display()))?;

    let reporter = ParseReporter::new(
        config.diagnostics.parse_report,
        config.diagnostics.parse_report_file.clone(),
    );
    let mut source = EventReader::new(reader, reporter);

    let run = run_pipeline(&mut source)?;

    stats.records_read = source.records_read();
    stats.missing_timestamps = source.missing_timestamps();
    let reporter = source.into_reporter();
    stats.malformed_records = reporter.total_issues();

    let writer = ReportWriter::with_current_stamp(&config.report.output_dir);
    let written = writer.write_all(&run.rollups, config.report.top_signatures)?;
    stats.reports_written = written.len();
    stats.finish();

    if let Some(summary) = reporter.generate_summary() {
        eprintln!("{}", summary);
    }
    if let Err(e) = reporter.write_summary_to_file() {
        // Diagnostics only: a lost parse summary does not undo the reports
        eprintln!(
            "{}",
            crate::config::format_warning_message_auto(&format!(
                "could not write parse summary: {}",
                e
            ))
        );
    }

    if config.diagnostics.show_stats {
        match config.diagnostics.stats_format {
            StatsFormat::Text => eprintln!("{}", stats.format_stats()),
            StatsFormat::Json => eprintln!("{}", stats.to_json()),
        }
    }

    Ok(format!(
        "aggregated {} records into {} reports in '{}'",
        run.records_dispatched,
        written.len(),
        config.report.output_dir.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn config_for(input: Option<&std::path::Path>, output_dir: &std::path::Path) -> TallyConfig {
        let mut config = TallyConfig::default();
        config.input.file = input.map(|p| p.to_path_buf());
        config.report.output_dir = output_dir.to_path_buf();
        config
    }

    #[test]
    fn test_successful_run_writes_four_reports() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("batch.csv");
        let mut input = fs::File::create(&input_path).unwrap();
        writeln!(input, "Timestamp,Severity,Product,Version,ErrorCode").unwrap();
        writeln!(input, "2024-03-01 10:15:00,Critical,Foo,1.0,E1").unwrap();
        drop(input);

        let out = dir.path().join("reports");
        let outcome = run(&config_for(Some(&input_path), &out));

        assert!(outcome.success, "run failed: {}", outcome.message);
        assert!(outcome.message.contains("1 records"));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 4);
    }

    #[test]
    fn test_unconfigured_input_fails_without_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reports");
        let outcome = run(&config_for(None, &out));

        assert!(!outcome.success);
        assert!(outcome.message.contains("no input file configured"));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_input_fails_without_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reports");
        let missing = dir.path().join("nope.csv");
        let outcome = run(&config_for(Some(&missing), &out));

        assert!(!outcome.success);
        assert!(outcome.message.contains("cannot read input file"));
        assert!(!out.exists());
    }
}
