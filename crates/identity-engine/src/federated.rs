//! Wire types for the browser handoff used by federated sign-in.
//!
//! The client opens `{web}/cli-auth?login_id=..&provider=..` and then polls
//! `{web}/api/cli-login-status?login_id=..` until the web app reports an
//! outcome.

use serde::Deserialize;

/// A federated login waiting for the user to finish in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedLoginStart {
    pub login_id: String,
    pub login_url: String,
}

/// One poll response. `status` is `pending`, `success`, `expired`,
/// `cancelled`, or `error`.
#[derive(Debug, Deserialize)]
pub(crate) struct FederatedStatus {
    pub status: String,
    #[serde(default)]
    pub session: Option<FederatedSession>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Tokens handed over by the web app once the provider popup completes.
#[derive(Debug, Deserialize)]
pub(crate) struct FederatedSession {
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<String>,
}
