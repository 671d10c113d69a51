//! Errors from loading configuration and preparing the data directory.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL for {setting}: {source}")]
    InvalidUrl {
        setting: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No home directory to put `~/.hobbyhub` under.
    #[error("Path error: {0}")]
    Path(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
