//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default backend API base URL (overridable at compile time via HOBBYHUB_API_URL).
pub const DEFAULT_API_URL: &str = match option_env!("HOBBYHUB_API_URL") {
    Some(url) => url,
    None => "http://localhost:5000",
};

/// Default identity provider API key (public, safe to expose).
pub const DEFAULT_IDENTITY_API_KEY: &str = match option_env!("HOBBYHUB_IDENTITY_API_KEY") {
    Some(key) => key,
    None => "local-dev-key",
};

/// Default identity toolkit base URL.
pub const DEFAULT_IDENTITY_URL: &str = match option_env!("HOBBYHUB_IDENTITY_URL") {
    Some(url) => url,
    None => "https://identitytoolkit.googleapis.com",
};

/// Default secure-token (refresh) base URL.
pub const DEFAULT_TOKEN_URL: &str = match option_env!("HOBBYHUB_TOKEN_URL") {
    Some(url) => url,
    None => "https://securetoken.googleapis.com",
};

/// Default web app URL, used for the federated sign-in handoff.
pub const DEFAULT_WEB_APP_URL: &str = match option_env!("HOBBYHUB_WEB_APP_URL") {
    Some(url) => url,
    None => "http://localhost:5173",
};

/// Avatar used when a user signs up without a photo.
pub const DEFAULT_PHOTO_URL: &str = "https://i.ibb.co/K7Vkt4m/default-avatar.png";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FEDERATED_TIMEOUT_SECS: u64 = 120;

/// Retry settings for requests rejected with an expired credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 2_000,
            max_delay_ms: 10_000,
        }
    }
}

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Backend REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Identity provider API key.
    #[serde(default = "default_identity_api_key")]
    pub identity_api_key: String,
    /// Identity toolkit base URL.
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
    /// Secure-token base URL.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Web app URL for federated sign-in.
    #[serde(default = "default_web_app_url")]
    pub web_app_url: String,
    /// Avatar applied on sign-up when none is given.
    #[serde(default = "default_photo_url")]
    pub default_photo_url: String,
    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long to wait for a federated sign-in to complete in the browser.
    #[serde(default = "default_federated_timeout_secs")]
    pub federated_timeout_secs: u64,
    /// Retry policy for expired credentials.
    #[serde(default)]
    pub retry: RetrySettings,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_identity_api_key() -> String {
    DEFAULT_IDENTITY_API_KEY.to_string()
}

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_web_app_url() -> String {
    DEFAULT_WEB_APP_URL.to_string()
}

fn default_photo_url() -> String {
    DEFAULT_PHOTO_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_federated_timeout_secs() -> u64 {
    DEFAULT_FEDERATED_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_url: default_api_url(),
            identity_api_key: default_identity_api_key(),
            identity_url: default_identity_url(),
            token_url: default_token_url(),
            web_app_url: default_web_app_url(),
            default_photo_url: default_photo_url(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            federated_timeout_secs: DEFAULT_FEDERATED_TIMEOUT_SECS,
            retry: RetrySettings::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides and validate URLs.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Some(log_level) = non_empty_env("HOBBYHUB_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(api_url) = non_empty_env("HOBBYHUB_API_URL") {
            self.api_url = api_url;
        }
    }

    /// Check that every configured URL parses and the timeouts are usable.
    pub fn validate(&self) -> CoreResult<()> {
        self.api_url()?;
        self.identity_url()?;
        self.token_url()?;
        self.web_app_url()?;
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(CoreError::Config(
                "retry.initial_delay_ms must not exceed retry.max_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the backend API URL as a parsed URL.
    pub fn api_url(&self) -> CoreResult<Url> {
        parse_url("api_url", &self.api_url)
    }

    /// Get the identity toolkit URL as a parsed URL.
    pub fn identity_url(&self) -> CoreResult<Url> {
        parse_url("identity_url", &self.identity_url)
    }

    /// Get the secure-token URL as a parsed URL.
    pub fn token_url(&self) -> CoreResult<Url> {
        parse_url("token_url", &self.token_url)
    }

    /// Get the web app URL as a parsed URL.
    pub fn web_app_url(&self) -> CoreResult<Url> {
        parse_url("web_app_url", &self.web_app_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn federated_timeout(&self) -> Duration {
        Duration::from_secs(self.federated_timeout_secs)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_url(setting: &'static str, raw: &str) -> CoreResult<Url> {
    Url::parse(raw).map_err(|source| CoreError::InvalidUrl { setting, source })
}
