//! Terminal UI helpers for consistent colored output.

use std::fmt::Display;
use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::error::FpnError;

/// Print a success message with green checkmark.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an info message with blue info icon.
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a warning with a yellow exclamation mark.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an error message with red X.
fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a hint/suggestion (dimmed, indented).
fn hint(msg: &str) {
    eprintln!("  {} {}", "→".dimmed(), msg.dimmed());
}

/// Format a value as bold cyan (device names, hostnames, paths).
pub fn highlight(s: impl Display) -> String {
    s.cyan().bold().to_string()
}

/// Print a section title preceded by a blank line.
pub fn section(title: &str) {
    println!();
    println!("{}:", title);
}

/// Print a top-level ` * label: value` line.
pub fn item(label: &str, value: impl Display) {
    println!(" {} {}: {}", "*".yellow(), label, highlight(value));
}

/// Print a nested ` - label: value` line.
pub fn detail(label: &str, value: impl Display) {
    println!(" {} {}: {}", "-".yellow(), label, highlight(value));
}

fn spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.dim} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run an async operation with a spinner showing the given message.
/// Returns the result of the operation.
pub async fn spin<T, F: Future<Output = T>>(msg: &str, fut: F) -> T {
    let spinner = spinner(msg);

    let result = fut.await;

    spinner.finish_and_clear();
    result
}

/// Display an error with contextual hints based on what went wrong.
pub fn print_error(err: &anyhow::Error) {
    error(&format!("{:#}", err));

    match err.downcast_ref::<FpnError>() {
        Some(FpnError::ConfigMissing(_)) => hint("Run: fpn login"),
        Some(FpnError::ConfigUnreadable { .. }) => {
            hint("The credentials file is damaged. Run: fpn login");
        }
        Some(FpnError::InvalidInput(_)) => hint("Example: fpn login https://fpn.firefox.com"),
        Some(FpnError::InvalidDeviceName { .. }) => {
            hint("Device names are between 1 and 128 characters long.");
        }
        Some(FpnError::Protocol { actual, .. }) if actual.as_u16() == 401 => {
            hint("Your session may have expired. Run: fpn login");
        }
        Some(FpnError::Network { .. }) => hint("Check your internet connection and try again."),
        Some(FpnError::AlreadyExists { .. }) => {
            hint("Pick another name, or remove it first: fpn deldevice <name>");
        }
        Some(FpnError::NotFound { kind: "Server", .. }) => {
            hint("List the available servers: fpn servers");
        }
        Some(FpnError::NotFound { kind: "Device", .. }) => {
            hint("List your devices: fpn show");
        }
        Some(FpnError::SubprocessFailure { .. }) => {
            hint("Is wireguard-tools installed and on your PATH?");
        }
        _ => {}
    }
}
