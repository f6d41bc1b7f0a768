use serde_json::json;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use crate::config::ParseReportStyle;

/// Recoverable parse issues. Rows with these problems are still aggregated
/// with whatever fields were available, never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseIssue {
    ShortRow,     // fewer fields than the schema
    LongRow,      // extra fields beyond the schema
    BadTimestamp, // timestamp present but unparseable
}

impl ParseIssue {
    fn label(self) -> &'static str {
        match self {
            ParseIssue::ShortRow => "short_row",
            ParseIssue::LongRow => "long_row",
            ParseIssue::BadTimestamp => "bad_timestamp",
        }
    }
}

/// Tallies malformed-row issues during a run and reports them according to
/// the configured style: per-row to stderr, as a summary at the end, or not
/// at all (the counts still feed the processing statistics).
#[derive(Debug)]
pub struct ParseReporter {
    style: ParseReportStyle,
    file: Option<PathBuf>,
    issue_counts: HashMap<&'static str, usize>,
    issue_examples: HashMap<&'static str, Vec<String>>,
    total: usize,
}

impl ParseReporter {
    pub fn new(style: ParseReportStyle, file: Option<PathBuf>) -> Self {
        Self {
            style,
            file,
            issue_counts: HashMap::new(),
            issue_examples: HashMap::new(),
            total: 0,
        }
    }

    /// Record one issue with a short human-readable detail string.
    pub fn report(&mut self, issue: ParseIssue, detail: String) {
        if self.style == ParseReportStyle::Print {
            eprintln!(
                "{}",
                crate::config::format_warning_message_auto(&format!(
                    "{}: {}",
                    issue.label(),
                    detail
                ))
            );
        }

        let label = issue.label();
        *self.issue_counts.entry(label).or_insert(0) += 1;

        let examples = self.issue_examples.entry(label).or_default();
        if examples.len() < 3 {
            examples.push(detail);
        }

        self.total += 1;
    }

    /// Total number of issues recorded across all categories.
    pub fn total_issues(&self) -> usize {
        self.total
    }

    pub fn has_issues(&self) -> bool {
        self.total > 0
    }

    /// Render the end-of-run summary, if the style asks for one.
    pub fn generate_summary(&self) -> Option<String> {
        if self.style != ParseReportStyle::Summary || self.total == 0 {
            return None;
        }

        let mut summary = json!({});
        for (label, count) in &self.issue_counts {
            let empty_examples = Vec::new();
            let examples = self.issue_examples.get(label).unwrap_or(&empty_examples);
            summary[*label] = json!({
                "count": count,
                "examples": examples,
            });
        }

        Some(
            serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|_| "Error serializing parse summary".to_string()),
        )
    }

    /// Write the JSON summary to the configured file, if any.
    /// The file is written regardless of the reporting style so that a
    /// quiet run can still leave a machine-readable trace.
    pub fn write_summary_to_file(&self) -> std::io::Result<()> {
        let Some(ref file_path) = self.file else {
            return Ok(());
        };

        let mut summary = json!({ "total": self.total });
        for (label, count) in &self.issue_counts {
            let empty_examples = Vec::new();
            let examples = self.issue_examples.get(label).unwrap_or(&empty_examples);
            summary[*label] = json!({
                "count": count,
                "examples": examples,
            });
        }

        let mut file = File::create(file_path)?;
        let rendered = serde_json::to_string_pretty(&summary)
            .unwrap_or_else(|_| "Error serializing parse summary".to_string());
        file.write_all(rendered.as_bytes())
    }
}
