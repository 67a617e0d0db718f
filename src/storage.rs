//! Durable client-side key-value storage.
//!
//! This is the process's stand-in for browser local storage: a small JSON object persisted
//! at `$POCKETBOOK_HOME/storage.json`. Reads and writes are synchronous and last-write-wins;
//! every mutation is flushed to disk before it returns. The `jwt_token` entry here is the
//! source of truth for "is logged in" across process restarts.

use crate::Result;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Storage key for the bearer credential.
pub const JWT_TOKEN: &str = "jwt_token";

/// Storage key for the display preference.
pub const THEME: &str = "theme";

/// A handle to the durable key-value store. Cloning shares the underlying map, so every
/// component in the process observes the same entries.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Storage {
    /// Opens the store at `path`, reading existing entries if the file is present.
    ///
    /// A missing file is an empty store. An unreadable or unparseable file is also treated
    /// as empty (with a warning) rather than an error: a corrupt entry must degrade to
    /// "logged out", not prevent startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Ignoring unparseable storage file {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Ignoring unreadable storage file {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("storage lock").get(key).cloned()
    }

    /// Sets `key` to `value` and persists immediately.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let snapshot = {
            let mut entries = self.entries.lock().expect("storage lock");
            entries.insert(key.to_string(), value.to_string());
            entries.clone()
        };
        self.persist(&snapshot)
    }

    /// Removes `key` and persists. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let snapshot = {
            let mut entries = self.entries.lock().expect("storage lock");
            entries.remove(key);
            entries.clone()
        };
        self.persist(&snapshot)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).context("Unable to serialize storage")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Unable to write storage file {}", self.path.display()))?;

        // The token lives here; keep the file private to the user.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions).with_context(|| {
                format!("Failed to set permissions on {}", self.path.display())
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("storage.json"));
        assert!(storage.get(JWT_TOKEN).is_none());
    }

    #[test]
    fn test_set_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let storage = Storage::open(&path);
        storage.set(JWT_TOKEN, "tok-abc").unwrap();
        assert_eq!(storage.get(JWT_TOKEN).as_deref(), Some("tok-abc"));

        // Re-open from disk: the entry survives the "page reload".
        let reopened = Storage::open(&path);
        assert_eq!(reopened.get(JWT_TOKEN).as_deref(), Some("tok-abc"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("storage.json"));
        storage.remove(JWT_TOKEN).unwrap();
        storage.set(JWT_TOKEN, "tok").unwrap();
        storage.remove(JWT_TOKEN).unwrap();
        assert!(storage.get(JWT_TOKEN).is_none());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json {{{{").unwrap();
        let storage = Storage::open(&path);
        assert!(storage.get(JWT_TOKEN).is_none());

        // And the store is still writable afterwards.
        storage.set(THEME, "dark").unwrap();
        assert_eq!(Storage::open(&path).get(THEME).as_deref(), Some("dark"));
    }

    #[test]
    fn test_clones_share_entries() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("storage.json"));
        let clone = storage.clone();
        storage.set(THEME, "light").unwrap();
        assert_eq!(clone.get(THEME).as_deref(), Some("light"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_restrictive() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let storage = Storage::open(&path);
        storage.set(JWT_TOKEN, "secret").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
