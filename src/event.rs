use chrono::{DateTime, Timelike, Utc};

/// One parsed input record describing a single logged error occurrence.
///
/// Built once per input row and read-only afterwards. The timestamp is
/// optional because parsing is permissive: a row with a missing or
/// unparseable timestamp still counts toward every rollup that does not
/// need an hour of day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub severity: String,
    pub product: String,
    pub version: String,
    pub error_code: String,
}

/// The composite identity (product, severity, error code) used to group
/// related errors. A typed key: the parts are never joined with a separator,
/// so field values containing delimiters cannot corrupt the grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub product: String,
    pub severity: String,
    pub error_code: String,
}

impl ErrorEvent {
    pub fn signature(&self) -> Signature {
        Signature {
            product: self.product.clone(),
            severity: self.severity.clone(),
            error_code: self.error_code.clone(),
        }
    }

    /// Hour of day in [0, 23], when a timestamp is present.
    pub fn hour(&self) -> Option<u8> {
        self.timestamp.map(|ts| ts.hour() as u8)
    }
}

/// Parse a record timestamp, trying common formats in order of likelihood.
pub fn parse_timestamp(ts_str: &str) -> Option<DateTime<Utc>> {
    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",    // Common log format with subseconds
        "%Y-%m-%d %H:%M:%S",       // Common log format
        "%Y-%m-%dT%H:%M:%S%.fZ",   // ISO 8601 with subseconds
        "%Y-%m-%dT%H:%M:%SZ",      // ISO 8601
        "%Y-%m-%dT%H:%M:%S%.f%:z", // ISO 8601 with timezone
        "%Y-%m-%dT%H:%M:%S%:z",    // ISO 8601 with timezone
    ];

    for format in &formats {
        if let Ok(dt) = DateTime::parse_from_str(ts_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts_str, format) {
            return Some(dt.and_utc());
        }
    }

    None
}
