//! Theme preference persistence.

use crate::{KeyValueStorage, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Theme implied by the system preference.
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Reads and writes the user's theme preference.
#[derive(Clone)]
pub struct PreferencesManager {
    storage: Arc<dyn KeyValueStorage>,
}

impl PreferencesManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The explicitly stored theme, if any. Unrecognized values read as unset.
    pub fn stored_theme(&self) -> StorageResult<Option<Theme>> {
        Ok(self
            .storage
            .get(StorageKeys::THEME)?
            .and_then(|raw| raw.parse().ok()))
    }

    /// Stored theme, or the system preference when nothing is stored.
    pub fn resolve_theme(&self, system_prefers_dark: bool) -> StorageResult<Theme> {
        Ok(self
            .stored_theme()?
            .unwrap_or_else(|| Theme::from_system(system_prefers_dark)))
    }

    pub fn set_theme(&self, theme: Theme) -> StorageResult<()> {
        tracing::debug!(theme = %theme, "Saving theme preference");
        self.storage.set(StorageKeys::THEME, theme.as_str())
    }

    /// Flip the effective theme and persist the result.
    pub fn toggle_theme(&self, system_prefers_dark: bool) -> StorageResult<Theme> {
        let next = self.resolve_theme(system_prefers_dark)?.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Forget the stored theme so the system preference applies again.
    pub fn clear_theme(&self) -> StorageResult<bool> {
        self.storage.delete(StorageKeys::THEME)
    }
}
