//! # Observability
//!
//! Centralized logging layer for the HobbyHub client.
//!
//! Crates in the workspace only emit `tracing` events. The binary calls
//! [`init_with_config`] once at startup and this crate decides where the
//! events go.
//!
//! ## Dev Mode
//!
//! With the `dev` feature (on by default) every event is written as one JSON
//! object per line to `~/.hobbyhub/logs/client.jsonl`:
//!
//! - `tail -f ~/.hobbyhub/logs/client.jsonl | jq` for pretty JSON
//! - `lnav ~/.hobbyhub/logs/client.jsonl` for interactive exploration
//!
//! Field values that look like credentials (bearer tokens, JWTs, long
//! base64 blobs) and fields named like secrets are redacted before they are
//! written.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "cli".into(),
//!         default_level: "debug".into(),
//!         also_stderr: true,
//!         ..Default::default()
//!     });
//!     tracing::info!("ready");
//! }
//! ```

#[cfg(feature = "dev")]
mod dev;

mod json_layer;
mod redact;

pub use json_layer::LogEntry;
pub use redact::redact_value;

use std::path::PathBuf;

/// Where events go and how they are filtered.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Written into every line as `service`.
    pub service_name: String,
    /// Filter used when `RUST_LOG` is unset.
    pub default_level: String,
    /// Defaults to `~/.hobbyhub/logs/client.jsonl`.
    pub log_path: Option<PathBuf>,
    pub also_stderr: bool,
    pub redact: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
            redact: true,
        }
    }
}

/// Install the global subscriber. Only the first call takes effect.
pub fn init_with_config(config: LogConfig) {
    #[cfg(feature = "dev")]
    dev::init_dev_subscriber(&config);

    #[cfg(not(feature = "dev"))]
    install_stderr_only(&config.default_level);
}

#[cfg(not(feature = "dev"))]
fn install_stderr_only(default_level: &str) {
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_writer(std::io::stderr)
        .finish()
        .try_init();
}
