//! File-backed token store
//!
//! Persists session credentials as a flat string map in `credentials.json`
//! under the arthabit directory, created with 0600 permissions on Unix.
//! Every mutation loads, updates and rewrites the whole file, so a
//! multi-entry update through `set_many` lands as a single rewrite.
//!
//! The CLI and the desktop shell can both touch this file, so every
//! operation holds an exclusive advisory lock on a sidecar
//! `credentials.json.lock` for the whole load-modify-rewrite window.
//! Without it, two concurrent writers would each read the old map and the
//! slower rewrite would silently drop the faster one's entries.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::ports::TokenStore;

/// Credentials filename inside the arthabit directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// Sidecar lock filename, next to the credentials file
const LOCK_FILE: &str = "credentials.json.lock";

/// On-disk structure: a flat string map
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(flatten)]
    entries: HashMap<String, String>,
}

/// Token store over a single JSON file
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileTokenStore {
    /// Create a store rooted at the arthabit directory.
    /// The file itself is created lazily on first operation.
    pub fn new(arthabit_dir: &Path) -> Self {
        Self {
            path: arthabit_dir.join(CREDENTIALS_FILE),
            lock_path: arthabit_dir.join(LOCK_FILE),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the advisory lock. The lock is released when the returned
    /// handle drops, so callers hold it in a binding for the whole
    /// operation.
    fn acquire_lock(&self) -> Result<File> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| {
                Error::storage(format!("Failed to open {}: {}", self.lock_path.display(), e))
            })?;

        lock_file.lock_exclusive().map_err(|e| {
            Error::storage(format!("Failed to lock {}: {}", self.lock_path.display(), e))
        })?;

        Ok(lock_file)
    }

    fn load(&self) -> Result<CredentialsFile> {
        if !self.path.exists() {
            return Ok(CredentialsFile::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            Error::storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            Error::storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, credentials: &CredentialsFile) -> Result<()> {
        let contents = serde_json::to_string_pretty(credentials)?;

        // Tokens are secrets, keep the file owner-only where we can
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .map_err(|e| {
                    Error::storage(format!("Failed to open {}: {}", self.path.display(), e))
                })?;
            file.write_all(contents.as_bytes()).map_err(|e| {
                Error::storage(format!("Failed to write {}: {}", self.path.display(), e))
            })?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents).map_err(|e| {
                Error::storage(format!("Failed to write {}: {}", self.path.display(), e))
            })?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _lock = self.acquire_lock()?;
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _lock = self.acquire_lock()?;
        let mut credentials = self.load()?;
        credentials.entries.insert(key.to_string(), value.to_string());
        self.save(&credentials)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _lock = self.acquire_lock()?;
        let mut credentials = self.load()?;
        for (key, value) in entries {
            credentials
                .entries
                .insert((*key).to_string(), (*value).to_string());
        }
        self.save(&credentials)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _lock = self.acquire_lock()?;
        let mut credentials = self.load()?;
        if credentials.entries.remove(key).is_none() {
            // Removing an absent key is fine, and skipping the rewrite keeps
            // remove idempotent even when the file doesn't exist yet
            return Ok(());
        }
        self.save(&credentials)
    }
}

// =============================================================================
// Tests
// =============================================================================
