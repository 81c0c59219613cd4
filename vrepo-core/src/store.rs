//! The abstract `KeyValueStore` the repository engine is built against, plus
//! two reference implementations: an in-memory store used as the library's
//! default and test fixture, and a JSON-file-backed store used by the CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RepositoryError;

/// Abstract mapping from virtual path to an encoded target stack.
///
/// The repository engine only ever stores `Vec<String>` values (see
/// [`crate::target`]); the store itself is agnostic to their meaning.
pub trait KeyValueStore {
    fn exists(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Option<Vec<String>>;
    fn set(&mut self, key: &str, value: Vec<String>);
    /// Returns true iff `key` existed prior to removal.
    fn remove(&mut self, key: &str) -> bool;
    fn keys(&self) -> Vec<String>;
}

/// In-memory reference implementation, backed by a `BTreeMap` so `keys()`
/// comes back in sorted (and therefore deterministic) order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: BTreeMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Vec<String>) {
        self.map.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }
}

/// JSON-file-backed store. Loads eagerly on [`FileStore::open`] and persists
/// the full map on every `set`/`remove`.
///
/// `KeyValueStore::set`/`remove` are infallible by contract, so a failed
/// write is logged via `tracing::error!` rather than propagated; callers
/// that need a hard guarantee should call [`FileStore::flush`] explicitly.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: BTreeMap<String, Vec<String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let map = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| RepositoryError::Io {
                action: "reading",
                path: path.clone(),
                source,
            })?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, map })
    }

    /// Force the in-memory map to disk, surfacing any I/O error.
    pub fn flush(&self) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| RepositoryError::Io {
                action: "creating directory for",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_string_pretty(&self.map)?;
        fs::write(&self.path, data).map_err(|source| RepositoryError::Io {
            action: "writing",
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn exists(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Vec<String>) {
        self.map.insert(key.to_string(), value);
        if let Err(error) = self.flush() {
            tracing::error!(%error, path = %self.path.display(), "failed to persist store after set");
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        let existed = self.map.remove(key).is_some();
        if existed {
            if let Err(error) = self.flush() {
                tracing::error!(%error, path = %self.path.display(), "failed to persist store after remove");
            }
        }
        existed
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }
}
