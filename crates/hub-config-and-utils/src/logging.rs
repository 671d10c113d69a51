//! Logging initialization for the client.
//!
//! Delegates to the observability crate, which writes structured JSONL to
//! `~/.hobbyhub/logs/client.jsonl`.

use crate::Paths;

/// Initialize the logging system.
///
/// - Structured JSONL output under the paths' logs directory
/// - Log level from RUST_LOG env var or the provided default
/// - Credential-shaped fields redacted
///
/// ```ignore
/// init_logging("info", &paths, false);
/// tracing::info!("client started");
/// ```
pub fn init_logging(level: &str, paths: &Paths, also_stderr: bool) {
    observability::init_with_config(observability::LogConfig {
        service_name: "cli".into(),
        default_level: parse_level(level).to_string().to_lowercase(),
        log_path: Some(paths.log_file()),
        also_stderr,
        ..Default::default()
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
