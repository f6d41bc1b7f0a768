use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::io::BufRead;

use crate::error_handling::{ParseIssue, ParseReporter};
use crate::event::{parse_timestamp, ErrorEvent};

/// Column layout of the input schema:
/// `Timestamp, Severity, Product, Version, ErrorCode`
pub const SCHEMA_FIELDS: usize = 5;

/// Lazily yields `ErrorEvent`s from a delimited batch file.
///
/// Parsing is permissive: whitespace is trimmed, short rows are padded with
/// empty fields, extra fields are ignored, the header row is consumed but
/// never validated, and no row is ever dropped. Anything suspicious is
/// tallied through the `ParseReporter`. Only I/O level failures surface as
/// errors, and those are fatal to the whole run.
pub struct EventReader<R: BufRead> {
    records: StringRecordsIntoIter<R>,
    reporter: ParseReporter,
    records_read: usize,
    missing_timestamps: usize,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R, reporter: ParseReporter) -> Self {
        let rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        Self {
            records: rdr.into_records(),
            reporter,
            records_read: 0,
            missing_timestamps: 0,
        }
    }

    /// Number of data rows read so far (the header row is not counted).
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Rows whose timestamp was missing or unparseable.
    pub fn missing_timestamps(&self) -> usize {
        self.missing_timestamps
    }

    /// Hand the reporter back once the stream is exhausted.
    pub fn into_reporter(self) -> ParseReporter {
        self.reporter
    }

    fn build_event(&mut self, record: &StringRecord) -> ErrorEvent {
        if record.len() < SCHEMA_FIELDS {
            self.reporter.report(
                ParseIssue::ShortRow,
                format!(
                    "row {} has {} of {} fields",
                    self.records_read,
                    record.len(),
                    SCHEMA_FIELDS
                ),
            );
        } else if record.len() > SCHEMA_FIELDS {
            self.reporter.report(
                ParseIssue::LongRow,
                format!(
                    "row {} has {} extra fields",
                    self.records_read,
                    record.len() - SCHEMA_FIELDS
                ),
            );
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let raw_ts = record.get(0).unwrap_or("");
        let timestamp = if raw_ts.is_empty() {
            None
        } else {
            let parsed = parse_timestamp(raw_ts);
            if parsed.is_none() {
                self.reporter.report(
                    ParseIssue::BadTimestamp,
                    format!("row {}: '{}'", self.records_read, raw_ts),
                );
            }
            parsed
        };
        if timestamp.is_none() {
            self.missing_timestamps += 1;
        }

        ErrorEvent {
            timestamp,
            severity: field(1),
            product: field(2),
            version: field(3),
            error_code: field(4),
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<ErrorEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => {
                self.records_read += 1;
                Some(Ok(self.build_event(&record)))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
