use is_terminal::IsTerminal;

use crate::config::ColorMode;

/// Check if stderr is connected to a TTY. Diagnostics go to stderr, so that
/// is the stream whose destination decides coloring.
pub fn is_stderr_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Determine if colors should be used based on the color mode and environment
pub fn should_use_colors(color_mode: &ColorMode) -> bool {
    match color_mode {
        ColorMode::Never => false,
        ColorMode::Always => {
            // Even with Always, respect NO_COLOR for accessibility
            std::env::var("NO_COLOR").is_err()
        }
        ColorMode::Auto => should_use_colors_auto(),
    }
}

/// Auto color detection logic
fn should_use_colors_auto() -> bool {
    if !is_stderr_tty() {
        return false;
    }

    // Respect NO_COLOR environment variable (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    true
}
