//! Bearer token holder with a write-through persisted mirror.
//!
//! DESIGN
//! ======
//! Memory is the source of truth. Every `set` updates memory first and then
//! mirrors to storage; storage is read exactly once, when the store is
//! built, so a process restart resumes the previous session.
//!
//! TRADE-OFFS
//! ==========
//! A failed storage write is logged and swallowed. The in-memory token stays
//! authoritative for this process even if the next process will not see it.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable key/value storage for the token mirror.
pub trait TokenStorage: Send + Sync {
    /// Read the entry for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the entry for `key`. Removing a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`. Characters outside `[A-Za-z0-9._-]`
    /// are replaced so a key can never escape the directory.
    #[must_use]
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
            .collect();
        let name = name.trim_start_matches('.');
        let name = if name.is_empty() { "token" } else { name };
        self.dir.join(name)
    }
}

impl TokenStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let value = contents.trim();
                Ok((!value.is_empty()).then(|| value.to_owned()))
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io { path: self.dir.clone(), source })?;
        let path = self.entry_path(key);
        std::fs::write(&path, value).map_err(|source| StorageError::Io { path: path.clone(), source })?;
        restrict_permissions(&path)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|source| StorageError::Io { path: path.to_path_buf(), source })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry, as if left by a previous run.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.lock().insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Current value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key).filter(|value| !value.is_empty()))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Shared handle to the single live bearer token.
///
/// Clones share the same token; there is at most one per client.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<TokenStoreInner>,
}

struct TokenStoreInner {
    key: String,
    token: RwLock<Option<String>>,
    storage: Arc<dyn TokenStorage>,
}

impl TokenStore {
    /// Build a store mirrored to `storage` under `key`, seeded from any
    /// entry already persisted there.
    pub fn new(storage: Arc<dyn TokenStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let seeded = match storage.load(&key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token; starting signed out");
                None
            }
        };
        if seeded.is_some() {
            tracing::debug!(key = %key, "seeded token from persisted storage");
        }
        Self { inner: Arc::new(TokenStoreInner { key, token: RwLock::new(seeded), storage }) }
    }

    /// A store with no durable mirror.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), crate::config::DEFAULT_TOKEN_KEY)
    }

    /// Replace the token. `None` (or an empty string) removes the persisted
    /// copy; anything else is written through.
    pub fn set(&self, token: Option<&str>) {
        let token = token.filter(|t| !t.is_empty()).map(ToOwned::to_owned);
        {
            let mut slot = self.inner.token.write().unwrap_or_else(PoisonError::into_inner);
            slot.clone_from(&token);
        }

        let mirrored = match token.as_deref() {
            Some(value) => self.inner.storage.save(&self.inner.key, value),
            None => self.inner.storage.remove(&self.inner.key),
        };
        if let Err(e) = mirrored {
            tracing::warn!(error = %e, "failed to mirror token to persisted storage");
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.inner.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Sole authentication predicate: presence only, never expiry.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.inner.token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn clear(&self) {
        self.set(None);
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("key", &self.inner.key)
            .field("present", &self.is_present())
            .finish_non_exhaustive()
    }
}
