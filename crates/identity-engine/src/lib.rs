//! Identity for the HobbyHub client.
//!
//! Wraps the identity toolkit behind [`IdentityProvider`]: password and
//! federated sign-in, sign-out, token refresh, and session-change
//! notifications. Session tokens are persisted through
//! [`hub_storage::IdentitySessionStore`] and restored on startup.

pub mod auth_fsm;
mod changes;
mod error;
mod federated;
mod firebase;
mod provider;
mod user;

pub use auth_fsm::{AuthMachine, AuthMachineInput, AuthMachineState, AuthState, RefreshConfig};
pub use changes::{SessionChangeHub, SessionChanges};
pub use error::{IdentityError, IdentityResult};
pub use federated::FederatedLoginStart;
pub use firebase::{FirebaseIdentity, IdentitySettings, UrlOpener};
pub use provider::IdentityProvider;
pub use user::{FederatedProvider, ProviderUser};
