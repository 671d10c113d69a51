//! Terminal rendering: plain text for people, JSON for scripts.

use clap::ValueEnum;
use serde::Serialize;
use session_propagation::{Notice, NoticeLevel, Notifier};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_line(status: &str, message: &str) -> String {
    serde_json::json!({ "status": status, "message": message }).to_string()
}

/// Success goes to stdout.
pub fn print_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{message}"),
        OutputFormat::Json => println!("{}", status_line("success", message)),
    }
}

/// Errors go to stderr so `--format json` output stays parseable.
pub fn print_error(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {message}"),
        OutputFormat::Json => eprintln!("{}", status_line("error", message)),
    }
}

pub fn print_row(label: &str, value: &str) {
    let label = format!("{label}:");
    println!("  {label:<16} {value}");
}

pub fn print_divider() {
    println!("{:-<50}", "");
}

pub fn print_heading(text: &str) {
    println!();
    println!("{text}");
    print_divider();
}

/// Shows notices inline as they are raised.
pub struct TerminalNotifier {
    format: OutputFormat,
}

impl TerminalNotifier {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let Notice { level, message } = notice;
        match level {
            NoticeLevel::Success => print_success(&message, self.format),
            NoticeLevel::Error => print_error(&message, self.format),
        }
    }
}
