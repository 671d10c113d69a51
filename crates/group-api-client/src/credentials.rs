//! Where the dispatcher gets its bearer credential.

use crate::{ApiError, ApiResult};
use async_trait::async_trait;
use identity_engine::IdentityProvider;
use std::sync::Arc;

/// Source of bearer credentials for outgoing requests.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Whether a session currently exists.
    fn has_session(&self) -> bool;

    /// Mint a credential. `Ok(None)` means no session.
    async fn bearer(&self, force_refresh: bool) -> ApiResult<Option<String>>;
}

/// Credentials minted by the identity client.
pub struct IdentityCredentials {
    identity: Arc<dyn IdentityProvider>,
}

impl IdentityCredentials {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl CredentialSource for IdentityCredentials {
    fn has_session(&self) -> bool {
        self.identity.current_user().is_some()
    }

    async fn bearer(&self, force_refresh: bool) -> ApiResult<Option<String>> {
        self.identity
            .id_token(force_refresh)
            .await
            .map_err(|e| ApiError::Credential(e.to_string()))
    }
}

/// No session, ever. For public-only clients.
pub struct Anonymous;

#[async_trait]
impl CredentialSource for Anonymous {
    fn has_session(&self) -> bool {
        false
    }

    async fn bearer(&self, _force_refresh: bool) -> ApiResult<Option<String>> {
        Ok(None)
    }
}
