//! Dev-mode logging configuration.
//!
//! Writes structured JSONL logs to a local file that can be tailed by
//! external tools. Append-only, flushed per line.

use crate::json_layer::JsonLayer;
use crate::LogConfig;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".hobbyhub")
        .join("logs")
        .join("client.jsonl")
}

/// Shared append-only handle on the log file. Every write is flushed so a
/// `tail -f` sees complete lines.
#[derive(Clone)]
pub struct LogFile {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl LogFile {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }
}

impl io::Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.file.lock();
        file.write_all(buf)?;
        file.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the JSONL file subscriber, plus a compact stderr layer if asked.
///
/// If the log file cannot be opened the stderr layer is installed alone, so
/// a read-only home directory never stops the client from starting.
pub fn init_dev_subscriber(config: &LogConfig) {
    let log_path = config.log_path.clone().unwrap_or_else(default_log_path);

    let (json_layer, open_error) = match LogFile::open(&log_path) {
        Ok(file) => (
            Some(
                JsonLayer::new(config.service_name.clone(), file, config.redact)
                    .with_filter(env_filter(&config.default_level)),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    let stderr_layer = if config.also_stderr || open_error.is_some() {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_filter(env_filter(&config.default_level)),
        )
    } else {
        None
    };

    let installed = tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    match open_error {
        None => tracing::debug!(log_path = %log_path.display(), "observability initialized"),
        Some(e) => tracing::warn!(
            log_path = %log_path.display(),
            error = %e,
            "log file unavailable, logging to stderr only"
        ),
    }
}
