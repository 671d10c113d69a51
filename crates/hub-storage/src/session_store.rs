//! Persisted identity session.

use crate::{KeyValueStorage, StorageError, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Seconds of remaining lifetime under which a token counts as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Identity session metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySessionMeta {
    /// Provider-issued unique user id
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// When the ID token expires (RFC 3339)
    pub expires_at: String,
}

/// Stores the identity tokens and metadata across restarts.
#[derive(Clone)]
pub struct IdentitySessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl IdentitySessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store a complete session (tokens + metadata).
    pub fn set_session(
        &self,
        id_token: &str,
        refresh_token: &str,
        meta: &IdentitySessionMeta,
    ) -> StorageResult<()> {
        self.storage.set(StorageKeys::IDENTITY_ID_TOKEN, id_token)?;
        self.storage
            .set(StorageKeys::IDENTITY_REFRESH_TOKEN, refresh_token)?;
        self.set_meta(meta)
    }

    pub fn get_id_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::IDENTITY_ID_TOKEN)
    }

    pub fn get_refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::IDENTITY_REFRESH_TOKEN)
    }

    pub fn set_meta(&self, meta: &IdentitySessionMeta) -> StorageResult<()> {
        let json = serde_json::to_string(meta).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::IDENTITY_SESSION_META, &json)
    }

    pub fn get_meta(&self) -> StorageResult<Option<IdentitySessionMeta>> {
        match self.storage.get(StorageKeys::IDENTITY_SESSION_META)? {
            Some(json) => {
                let meta = serde_json::from_str(&json)
                    .map_err(|e| StorageError::Encoding(e.to_string()))?;
                Ok(Some(meta))
            }
            None => Ok(None),
        }
    }

    /// A session exists when both the refresh token and metadata are stored.
    pub fn has_session(&self) -> StorageResult<bool> {
        let has_token = self.storage.has(StorageKeys::IDENTITY_REFRESH_TOKEN)?;
        let has_meta = self.storage.has(StorageKeys::IDENTITY_SESSION_META)?;
        Ok(has_token && has_meta)
    }

    /// True when the ID token has under a minute left, or no session exists.
    pub fn is_session_expired(&self) -> StorageResult<bool> {
        match self.get_meta()? {
            Some(meta) => {
                let expires_at = chrono::DateTime::parse_from_rfc3339(&meta.expires_at)
                    .map_err(|e| StorageError::Encoding(e.to_string()))?;
                let now = chrono::Utc::now();
                Ok(expires_at.signed_duration_since(now).num_seconds() < EXPIRY_SKEW_SECS)
            }
            None => Ok(true),
        }
    }

    /// Remove every session key. Missing keys are not an error.
    pub fn clear_session(&self) -> StorageResult<()> {
        self.storage.delete(StorageKeys::IDENTITY_ID_TOKEN)?;
        self.storage.delete(StorageKeys::IDENTITY_REFRESH_TOKEN)?;
        self.storage.delete(StorageKeys::IDENTITY_SESSION_META)?;
        Ok(())
    }
}
