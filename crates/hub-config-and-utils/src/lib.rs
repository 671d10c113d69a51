//! Configuration, paths, and logging setup shared by the HobbyHub client crates.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, RetrySettings, DEFAULT_API_URL, DEFAULT_IDENTITY_API_KEY, DEFAULT_IDENTITY_URL,
    DEFAULT_LOG_LEVEL, DEFAULT_PHOTO_URL, DEFAULT_TOKEN_URL, DEFAULT_WEB_APP_URL,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
