//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Theme preference ("light" or "dark")
    pub const THEME: &'static str = "theme";

    /// Identity provider ID token (bearer credential)
    pub const IDENTITY_ID_TOKEN: &'static str = "identity_id_token";

    /// Identity provider refresh token
    pub const IDENTITY_REFRESH_TOKEN: &'static str = "identity_refresh_token";

    /// Identity session metadata (JSON)
    pub const IDENTITY_SESSION_META: &'static str = "identity_session_meta";

    /// Every key, for uniqueness checks and full resets.
    pub const ALL: [&'static str; 4] = [
        Self::THEME,
        Self::IDENTITY_ID_TOKEN,
        Self::IDENTITY_REFRESH_TOKEN,
        Self::IDENTITY_SESSION_META,
    ];
}
