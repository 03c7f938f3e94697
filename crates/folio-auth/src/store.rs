//! Token store implementations.
//!
//! All operations are synchronous: when [`TokenStore::set`] returns, the
//! token is already durable, so a request started right afterwards reads it.
//! Storage failures are logged and otherwise ignored.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::errors::AuthError;

/// Holder of at most one bearer token.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` when logged out.
    fn get(&self) -> Option<String>;

    /// Replace the stored token. A blank token clears the store.
    fn set(&self, token: &str);

    /// Remove the stored token. Idempotent.
    fn clear(&self);
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// Token persisted as plain text in a single file.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the token, creating parent directories. Sets permissions to 0o600.
    pub fn try_set(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return self.try_clear();
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&self.path, perms);
        }

        Ok(())
    }

    /// Delete the token file. A missing file is not an error.
    pub fn try_clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Io(e)),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read token file: {e}");
                return None;
            }
        };
        let token = data.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn set(&self, token: &str) {
        if let Err(e) = self.try_set(token) {
            tracing::warn!(path = %self.path.display(), "failed to persist token: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!(path = %self.path.display(), "failed to remove token file: {e}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Token kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `token`.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) {
        let token = token.trim();
        *self.token.write() = (!token.is_empty()).then(|| token.to_string());
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
