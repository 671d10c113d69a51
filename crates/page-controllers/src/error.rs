use group_api_client::{ApiError, DraftError};
use thiserror::Error;

/// Errors from page-level flows. The user has already been notified by the
/// time one of these is returned.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("sign-in required to open {from}")]
    SignInRequired { from: String },

    #[error(transparent)]
    Invalid(#[from] DraftError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PageError {
    pub fn is_sign_in_required(&self) -> bool {
        matches!(self, PageError::SignInRequired { .. })
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            PageError::Api(e) => Some(e),
            _ => None,
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;
