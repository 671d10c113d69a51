//! Local persistence for the HobbyHub client.
//!
//! One key-value store backs two concerns:
//! - the theme preference ([`PreferencesManager`])
//! - the persisted identity session ([`IdentitySessionStore`])

mod file;
mod keys;
mod memory;
mod preferences;
mod session_store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use preferences::{PreferencesManager, Theme};
pub use session_store::{IdentitySessionMeta, IdentitySessionStore};
pub use traits::KeyValueStorage;

use hub_config_and_utils::Paths;
use std::sync::Arc;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open the default file-backed storage under the client's base directory.
pub fn create_storage(paths: &Paths) -> StorageResult<Arc<dyn KeyValueStorage>> {
    let storage = FileStorage::open(paths.storage_file())?;
    Ok(Arc::new(storage))
}
