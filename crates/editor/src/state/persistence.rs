//! Durable mirror of the history stacks
//!
//! Stacks are stored as JSON arrays of snapshot strings in a key-value store.
//! Everything here is best-effort: the caller logs failures and carries on
//! with correct in-memory history.

use std::collections::HashMap;

use shared::Snapshot;
use tracing::{debug, warn};

/// Storage key of the persisted undo stack
pub const UNDO_STACK_KEY: &str = "undoStack";
/// Storage key of the persisted redo stack
pub const REDO_STACK_KEY: &str = "redoStack";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("failed to serialize stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal string key-value store (browser `localStorage` semantics)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store, used by tests and the headless harness
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use std::path::{Path, PathBuf};

    use super::{KeyValueStore, StoreError};

    /// One file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// Store under the platform data directory
        pub fn in_data_dir() -> Option<Self> {
            directories::ProjectDirs::from("com", "canvas", "canvas-editor")
                .map(|dirs| Self::new(dirs.data_dir().join("history")))
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
                && !key.starts_with('.');
            if !valid {
                return Err(StoreError::InvalidKey(key.to_string()));
            }
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let path = self.path_for(key)?;
            match std::fs::read_to_string(&path) {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            let path = self.path_for(key)?;
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(path, value)?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            let path = self.path_for(key)?;
            match std::fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Reads and writes history stacks and the handoff slot through a store
#[derive(Debug)]
pub struct PersistenceBridge<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Bridge over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Serialize and store the named stack
    pub fn save_stack(&mut self, name: &str, stack: &[Snapshot]) -> Result<(), StoreError> {
        let json = serde_json::to_string(stack)?;
        self.store.set(name, &json)?;
        debug!("Saved {} ({} entries, {} bytes)", name, stack.len(), json.len());
        Ok(())
    }

    /// Previously stored stack. Missing, unreadable, or corrupt entries yield
    /// an empty stack.
    pub fn load_stack(&self, name: &str) -> Vec<Snapshot> {
        let json = match self.store.get(name) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {name}: {e}");
                return Vec::new();
            }
        };

        let stack: Vec<Snapshot> = match serde_json::from_str(&json) {
            Ok(stack) => stack,
            Err(e) => {
                warn!("Discarding corrupt {name}: {e}");
                return Vec::new();
            }
        };

        // Every entry must rebuild a scene, otherwise the stack is unusable
        if let Some(bad) = stack.iter().position(|s| !is_valid_snapshot(s)) {
            warn!("Discarding {name}: entry {bad} is not a valid scene");
            return Vec::new();
        }

        debug!("Loaded {} ({} entries)", name, stack.len());
        stack
    }

    /// Delete the named stack from the store
    pub fn clear_stack(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.remove(name)?;
        debug!("Cleared {}", name);
        Ok(())
    }

    pub(crate) fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get(key)
    }

    pub(crate) fn write_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set(key, value)
    }

    pub(crate) fn remove_raw(&mut self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key)
    }
}

/// Whether a snapshot rebuilds into a scene
pub fn is_valid_snapshot(snapshot: &Snapshot) -> bool {
    snapshot.restore().is_ok()
}
