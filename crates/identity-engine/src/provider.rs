//! The identity provider boundary.

use crate::{AuthState, FederatedProvider, IdentityResult, ProviderUser, SessionChanges};
use async_trait::async_trait;

/// Everything the rest of the client needs from an identity provider.
///
/// Implementations publish a session change after every successful
/// sign-up/sign-in, after sign-out, and when a session is revoked.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<ProviderUser>;

    /// Update the signed-in user's display name and/or photo.
    async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> IdentityResult<ProviderUser>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> IdentityResult<ProviderUser>;

    /// Sign in through a third-party provider.
    async fn sign_in_federated(&self, provider: FederatedProvider) -> IdentityResult<ProviderUser>;

    /// Sign out. Succeeds without a session.
    async fn sign_out(&self) -> IdentityResult<()>;

    fn current_user(&self) -> Option<ProviderUser>;

    fn auth_state(&self) -> AuthState;

    fn subscribe(&self) -> SessionChanges;

    /// Mint a bearer credential for the current session, or `None` without one.
    async fn id_token(&self, force_refresh: bool) -> IdentityResult<Option<String>>;
}
