use colored::*;
use log::{error, info, warn};

/// Print a success message with a green checkmark
pub fn success(msg: &str) {
    info!("{} {}", "✓".green(), msg);
}

/// Print an info message with a blue info symbol
#[allow(dead_code)]
pub fn info(msg: &str) {
    info!("{} {}", "ℹ".blue(), msg);
}

/// Print a warning message with a yellow warning symbol
pub fn warning(msg: &str) {
    warn!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message with a red X
#[allow(dead_code)]
pub fn error(msg: &str) {
    error!("{} {}", "✗".red(), msg);
}
