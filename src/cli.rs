// CLI-specific types and structures
// This module contains the command-line interface definitions and parsing logic

use clap::Parser;
use clap_complete::Shell;

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum StatsFormat {
    Text,
    Json,
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum ParseReport {
    None,
    Summary,
    Print,
}

// CLI structure - contains all command-line arguments and options
#[derive(Parser)]
#[command(name = "logtally")]
#[command(about = "Aggregate a batch file of error-log records into statistical rollup reports")]
#[command(
    long_about = "Aggregate a batch file of error-log records into statistical rollup reports\n\nReads one delimited input file (header row, columns Timestamp, Severity,\nProduct, Version, ErrorCode; gzip/zstd transparently decompressed) and\nwrites four CSV reports: severity distribution, product/version\ndistribution, top error signatures, and peak hour of day per signature.\n\nCOMMON EXAMPLES:\n  logtally errors.csv\n  logtally errors.csv.gz -o /var/reports --top 25\n  logtally errors.csv --stats --parse-report summary"
)]
#[command(version)]
pub struct Cli {
    /// Input batch file (delimited text with a header row)
    pub file: Option<String>,

    /// Directory where report files are written (created on demand)
    #[arg(
        short = 'o',
        long = "output-dir",
        default_value = "reports",
        help_heading = "Output Options"
    )]
    pub output_dir: String,

    /// Number of rows to keep in the error-signature report
    #[arg(long = "top", default_value_t = 10, help_heading = "Output Options")]
    pub top: usize,

    /// Print processing statistics to stderr after the run
    #[arg(long = "stats", help_heading = "Diagnostics")]
    pub stats: bool,

    /// Statistics rendering
    #[arg(
        long = "stats-format",
        value_enum,
        default_value = "text",
        help_heading = "Diagnostics"
    )]
    pub stats_format: StatsFormat,

    /// How to report malformed input rows (they are aggregated either way)
    #[arg(
        long = "parse-report",
        value_enum,
        default_value = "none",
        help_heading = "Diagnostics"
    )]
    pub parse_report: ParseReport,

    /// Write the malformed-row summary as JSON to this file
    #[arg(long = "parse-report-file", help_heading = "Diagnostics")]
    pub parse_report_file: Option<String>,

    /// When to color stderr messages
    #[arg(
        long = "color",
        value_enum,
        default_value = "auto",
        help_heading = "Diagnostics"
    )]
    pub color: ColorMode,

    /// Generate shell completion script and exit
    #[arg(long = "completions", value_enum, help_heading = "Diagnostics")]
    pub completions: Option<Shell>,
}
