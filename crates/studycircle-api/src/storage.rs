// Persisted credential slot
//
// A small string key/value store that outlives a single process, the
// client-side analog of browser local storage. The HTTP client reads the
// bearer token from it; the auth store keeps the current user and session
// in it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::Error;

/// Storage key holding the bearer token attached to every request.
pub const TOKEN_KEY: &str = "token";

/// String key/value slot shared between the HTTP client and the stores.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}

// ── In-memory ────────────────────────────────────────────────────────

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.remove(key);
        Ok(())
    }
}

// ── File-backed ──────────────────────────────────────────────────────

/// Storage persisted as a single JSON object on disk.
///
/// The file is read once on open and rewritten in full on every mutation.
/// A missing file is an empty store; an unreadable one is logged and
/// treated as empty so a corrupt state file never blocks login.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened state file");
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }
        let raw =
            serde_json::to_string_pretty(entries).map_err(|e| Error::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| {
            Error::Storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(key).cloned()
    }

    // Memory only changes once the file write has gone through.
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.flush(&next)?;
        *guard = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.contains_key(key) {
            return Ok(());
        }
        let mut next = guard.clone();
        next.remove(key);
        self.flush(&next)?;
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_and_removes() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
        storage.remove(TOKEN_KEY).unwrap();
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "s-1").unwrap();
        storage.set("user", "{\"_id\":\"u1\"}").unwrap();

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("s-1"));
        assert_eq!(reopened.get("user").as_deref(), Some("{\"_id\":\"u1\"}"));
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let storage = FileStorage::open(blocker.join("state.json"));
        assert!(storage.set(TOKEN_KEY, "s-1").is_err());
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn failed_remove_keeps_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "s-1").unwrap();

        // A directory in place of the file makes the next write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(storage.remove(TOKEN_KEY).is_err());
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("s-1"));
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path);
        assert!(storage.get(TOKEN_KEY).is_none());
    }
}
