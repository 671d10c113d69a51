use crate::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The user as the identity provider knows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// Provider-issued unique id.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl ProviderUser {
    pub fn from_meta(meta: &hub_storage::IdentitySessionMeta) -> Self {
        Self {
            uid: meta.uid.clone(),
            email: meta.email.clone(),
            display_name: meta.display_name.clone(),
            photo_url: meta.photo_url.clone(),
        }
    }
}

/// Third-party providers supported for federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "google",
        }
    }
}

impl fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FederatedProvider {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(FederatedProvider::Google),
            other => Err(IdentityError::UnsupportedProvider(other.to_string())),
        }
    }
}
