use std::path::PathBuf;

use crate::cli::Cli;

/// Main configuration struct for logtally
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub input: InputConfig,
    pub report: ReportConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Input configuration
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// The batch file to aggregate. `None` means the location was never
    /// configured, which fails the run without touching the filesystem.
    pub file: Option<PathBuf>,
}

/// Report output configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub top_signatures: usize,
}

/// Diagnostics configuration
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    pub show_stats: bool,
    pub stats_format: StatsFormat,
    pub parse_report: ParseReportStyle,
    pub parse_report_file: Option<PathBuf>,
    pub color: ColorMode,
}

/// Statistics rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsFormat {
    #[default]
    Text,
    Json,
}

/// Malformed-row reporting style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseReportStyle {
    #[default]
    Off,
    Summary,
    Print,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl TallyConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            input: InputConfig {
                file: cli.file.clone().map(PathBuf::from),
            },
            report: ReportConfig {
                output_dir: PathBuf::from(&cli.output_dir),
                top_signatures: cli.top,
            },
            diagnostics: DiagnosticsConfig {
                show_stats: cli.stats,
                stats_format: cli.stats_format.clone().into(),
                parse_report: cli.parse_report.clone().into(),
                parse_report_file: cli.parse_report_file.clone().map(PathBuf::from),
                color: cli.color.clone().into(),
            },
        }
    }
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            input: InputConfig { file: None },
            report: ReportConfig {
                output_dir: PathBuf::from("reports"),
                top_signatures: 10,
            },
            diagnostics: DiagnosticsConfig {
                show_stats: false,
                stats_format: StatsFormat::Text,
                parse_report: ParseReportStyle::Off,
                parse_report_file: None,
                color: ColorMode::Auto,
            },
        }
    }
}

// Conversion traits from the CLI value enums
impl From<crate::cli::StatsFormat> for StatsFormat {
    fn from(format: crate::cli::StatsFormat) -> Self {
        match format {
            crate::cli::StatsFormat::Text => StatsFormat::Text,
            crate::cli::StatsFormat::Json => StatsFormat::Json,
        }
    }
}

impl From<crate::cli::ParseReport> for ParseReportStyle {
    fn from(style: crate::cli::ParseReport) -> Self {
        match style {
            crate::cli::ParseReport::None => ParseReportStyle::Off,
            crate::cli::ParseReport::Summary => ParseReportStyle::Summary,
            crate::cli::ParseReport::Print => ParseReportStyle::Print,
        }
    }
}

impl From<crate::cli::ColorMode> for ColorMode {
    fn from(mode: crate::cli::ColorMode) -> Self {
        match mode {
            crate::cli::ColorMode::Auto => ColorMode::Auto,
            crate::cli::ColorMode::Always => ColorMode::Always,
            crate::cli::ColorMode::Never => ColorMode::Never,
        }
    }
}

/// Format an error message with the tool prefix, colored when allowed.
pub fn format_error_message(message: &str, color_mode: &ColorMode) -> String {
    if crate::tty::should_use_colors(color_mode) {
        format!("logtally: \x1b[91merror:\x1b[0m {}", message)
    } else {
        format!("logtally: error: {}", message)
    }
}

/// Format a warning message using auto color detection.
pub fn format_warning_message_auto(message: &str) -> String {
    if crate::tty::should_use_colors(&ColorMode::Auto) {
        format!("logtally: \x1b[93mwarning:\x1b[0m {}", message)
    } else {
        format!("logtally: warning: {}", message)
    }
}
