use identity_engine::IdentityError;
use thiserror::Error;

/// Errors from the session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected before reaching the identity provider.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl SessionError {
    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation(message) => message.clone(),
            SessionError::Identity(e) => e.user_message(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
