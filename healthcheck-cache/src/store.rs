//! String key/value stores standing in for browser `localStorage`.

use crate::error::{CacheError, CacheResult};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Synchronous string storage keyed by string.
///
/// Implementations must be safe to share between tasks; all access is
/// short and synchronous, like `localStorage`.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> CacheResult<()>;
}

/// In-memory store; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        let items = self.items.read().map_err(|_| CacheError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut items = self.items.write().map_err(|_| CacheError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        let mut items = self.items.write().map_err(|_| CacheError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one file per key.
///
/// File names are the hex encoding of the key, so any key is a valid name
/// and distinct keys never collide.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> CacheResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(key.as_bytes())))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> CacheResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> CacheResult<()> {
        let path = self.path_for(key);
        // Write-then-rename: readers never observe a partial blob.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CacheResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
