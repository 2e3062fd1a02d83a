//! Durable storage of the session credential.
//!
//! Two named entries are kept: the bearer token and the serialized identity. They are
//! written together on login, removed together on logout and read once at start-up.

use crate::error::ConsoleError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub const TOKEN_ENTRY: &str = "auth_token";
pub const IDENTITY_ENTRY: &str = "auth_user.json";

/// A small named-entry store.
pub trait CredentialStore: Send + Sync {
    /// Returns `None` when the entry does not exist.
    fn read(&self, name: &str) -> Result<Option<String>, ConsoleError>;

    fn write(&self, name: &str, value: &str) -> Result<(), ConsoleError>;

    /// Removing a missing entry is not an error.
    fn remove(&self, name: &str) -> Result<(), ConsoleError>;
}

/// Keeps each entry as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self, name: &str) -> Result<Option<String>, ConsoleError> {
        match fs::read_to_string(self.path(name)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, value: &str) -> Result<(), ConsoleError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(name), value)?;
        debug!(entry = name, dir = %self.dir.display(), "Credential entry written");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ConsoleError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self, name: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.entries().get(name).cloned())
    }

    fn write(&self, name: &str, value: &str) -> Result<(), ConsoleError> {
        self.entries().insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ConsoleError> {
        self.entries().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_creates_directory_on_first_write() {
        let temp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp.path().join("nested").join("creds"));

        assert_eq!(store.read(TOKEN_ENTRY).unwrap(), None);
        store.write(TOKEN_ENTRY, "tok-123").unwrap();

        assert_eq!(store.read(TOKEN_ENTRY).unwrap().as_deref(), Some("tok-123"));
        assert!(store.dir().join(TOKEN_ENTRY).exists());
    }

    #[test]
    fn removing_a_missing_entry_succeeds() {
        let temp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp.path());

        store.remove(IDENTITY_ENTRY).unwrap();
        store.write(IDENTITY_ENTRY, "{}").unwrap();
        store.remove(IDENTITY_ENTRY).unwrap();
        assert_eq!(store.read(IDENTITY_ENTRY).unwrap(), None);
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryCredentialStore::new();
        store.write(TOKEN_ENTRY, "a").unwrap();
        store.write(TOKEN_ENTRY, "b").unwrap();
        assert_eq!(store.read(TOKEN_ENTRY).unwrap().as_deref(), Some("b"));
    }
}
