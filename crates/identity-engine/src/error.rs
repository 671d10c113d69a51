//! Identity error types.

use thiserror::Error;

/// Identity client error type.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid email address")]
    InvalidEmail,

    /// Rejected by the provider or by the local password rules
    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("User account disabled")]
    UserDisabled,

    #[error("Too many attempts")]
    TooManyAttempts,

    /// The user closed the federated sign-in window
    #[error("Federated sign-in cancelled")]
    FederatedCancelled,

    /// The federated login link expired before it was completed
    #[error("Federated sign-in expired")]
    FederatedExpired,

    /// Federated sign-in failed for another provider-reported reason
    #[error("Federated sign-in with {provider} failed: {message}")]
    FederatedFailed { provider: String, message: String },

    #[error("Unsupported federated provider: {0}")]
    UnsupportedProvider(String),

    /// The provider has no configuration for this project
    #[error("Provider configuration not found")]
    ConfigurationNotFound,

    /// The calling domain is not on the provider's allow list
    #[error("Unauthorized domain: {0}")]
    UnauthorizedDomain(String),

    #[error("Provider internal error")]
    ProviderInternal,

    /// Any other provider error code
    #[error("Provider error {code}: {message}")]
    Provider { code: String, message: String },

    /// Operation requires a session
    #[error("Not signed in")]
    NotSignedIn,

    /// Session was invalidated server-side (revoked, deleted user, etc.)
    #[error("Session invalid: {0}")]
    SessionInvalid(String),

    /// Refresh retries exhausted
    #[error("Token refresh failed after {0} attempts")]
    RefreshExhausted(u32),

    /// Invalid state transition in the auth FSM
    #[error("Invalid auth state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Storage error: {0}")]
    Storage(#[from] hub_storage::StorageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Operation timed out")]
    Timeout,

    /// Network unavailable (transient error, can retry)
    #[error("Network unavailable")]
    NetworkUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IdentityError {
    /// Map a provider error code (`EMAIL_NOT_FOUND`, `WEAK_PASSWORD`, ...)
    /// to a typed error. `detail` is the text after the ` : ` separator.
    pub fn from_provider_code(code: &str, detail: Option<&str>) -> Self {
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                IdentityError::InvalidCredentials
            }
            "EMAIL_EXISTS" => IdentityError::EmailInUse,
            "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityError::InvalidEmail,
            "WEAK_PASSWORD" => IdentityError::WeakPassword(
                detail
                    .unwrap_or("Password should be at least 6 characters")
                    .to_string(),
            ),
            "USER_DISABLED" => IdentityError::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::TooManyAttempts,
            "CONFIGURATION_NOT_FOUND" => IdentityError::ConfigurationNotFound,
            "UNAUTHORIZED_DOMAIN" => {
                IdentityError::UnauthorizedDomain(detail.unwrap_or_default().to_string())
            }
            "INTERNAL_ERROR" => IdentityError::ProviderInternal,
            "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND"
            | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => IdentityError::SessionInvalid(code.to_string()),
            other => IdentityError::Provider {
                code: other.to_string(),
                message: detail.unwrap_or(other).to_string(),
            },
        }
    }

    /// Parse the raw provider message, e.g. `"WEAK_PASSWORD : Password should be ..."`.
    pub fn from_provider_message(raw: &str) -> Self {
        match raw.split_once(" : ") {
            Some((code, detail)) => Self::from_provider_code(code.trim(), Some(detail.trim())),
            None => Self::from_provider_code(raw.trim(), None),
        }
    }

    /// Map an error reported by the federated handoff (`auth/popup-closed-by-user`, ...).
    pub fn from_federated_error(provider: &str, error: &str, domain: &str) -> Self {
        let code = error.trim().trim_start_matches("auth/");
        match code {
            "popup-closed-by-user" | "cancelled-popup-request" | "cancelled" => {
                IdentityError::FederatedCancelled
            }
            "configuration-not-found" => IdentityError::ConfigurationNotFound,
            "unauthorized-domain" => IdentityError::UnauthorizedDomain(domain.to_string()),
            "internal-error" => IdentityError::ProviderInternal,
            _ => IdentityError::FederatedFailed {
                provider: provider.to_string(),
                message: error.to_string(),
            },
        }
    }

    /// Returns true if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            IdentityError::NetworkUnavailable => true,
            IdentityError::Timeout => true,
            IdentityError::ProviderInternal => true,
            IdentityError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            _ => false,
        }
    }

    /// A message fit to show the user. Each provider failure reads differently.
    pub fn user_message(&self) -> String {
        match self {
            IdentityError::InvalidCredentials => "Invalid email or password.".to_string(),
            IdentityError::EmailInUse => "An account with this email already exists.".to_string(),
            IdentityError::InvalidEmail => "Please enter a valid email address.".to_string(),
            IdentityError::WeakPassword(detail) => detail.clone(),
            IdentityError::UserDisabled => "This account has been disabled.".to_string(),
            IdentityError::TooManyAttempts => {
                "Too many attempts. Please try again later.".to_string()
            }
            IdentityError::FederatedCancelled => "Sign-in cancelled. Please try again.".to_string(),
            IdentityError::FederatedExpired => {
                "The sign-in link expired. Please try again.".to_string()
            }
            IdentityError::FederatedFailed { provider, message } => {
                format!("Failed to sign in with {}: {}", provider_label(provider), message)
            }
            IdentityError::UnsupportedProvider(provider) => {
                format!("Sign-in with {} is not supported.", provider)
            }
            IdentityError::ConfigurationNotFound => {
                "Authentication configuration error. Please contact support.".to_string()
            }
            IdentityError::UnauthorizedDomain(domain) => format!(
                "This domain ({}) is not authorized for sign-in. Please contact support.",
                domain
            ),
            IdentityError::ProviderInternal => {
                "Internal authentication error. Please try again or contact support.".to_string()
            }
            IdentityError::Provider { message, .. } => format!("Authentication failed: {}", message),
            IdentityError::NotSignedIn => "You are not signed in.".to_string(),
            IdentityError::SessionInvalid(_) | IdentityError::RefreshExhausted(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            IdentityError::Timeout => "Sign-in timed out. Please try again.".to_string(),
            IdentityError::NetworkUnavailable | IdentityError::Http(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            IdentityError::InvalidStateTransition(_)
            | IdentityError::Storage(_)
            | IdentityError::Json(_)
            | IdentityError::InvalidUrl(_)
            | IdentityError::Config(_) => "Authentication failed. Please try again.".to_string(),
        }
    }
}

fn provider_label(provider: &str) -> String {
    let mut chars = provider.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result type alias using IdentityError.
pub type IdentityResult<T> = Result<T, IdentityError>;
