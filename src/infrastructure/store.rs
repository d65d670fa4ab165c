//! Key-value storage for state that must survive between page loads.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::infrastructure::traits::FileSystem;

/// Key-value store capability: the single shared slot the entry page writes
/// and the replay page reads. Last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, None if absent.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// Returns once the value is durable.
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn clear(&self, key: &str) -> io::Result<()>;
}

/// File-backed store: one `<key>.json` file per key under a state directory.
pub struct FileKeyValueStore {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    /// File backing `key`. Keys are plain names, never paths.
    pub fn key_path(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.key_path(key)?;
        match self.fs.read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(level = "debug", skip(self, value))]
    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.key_path(key)?;
        self.fs.ensure_parent(&path)?;
        // Write aside, then rename over the old value
        let staging = path.with_extension("json.tmp");
        self.fs.write(&staging, value)?;
        self.fs.rename(&staging, &path)?;
        debug!("set: {} -> {}", key, path.display());
        Ok(())
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        let path = self.key_path(key)?;
        match self.fs.remove_file(&path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "store lock poisoned"))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    #[test]
    fn given_file_store_when_set_twice_then_last_write_wins() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(Arc::new(RealFileSystem), temp.path().join("state"));

        store.set("decisionPath", "[0,1]").unwrap();
        store.set("decisionPath", "[0,2,5]").unwrap();

        assert_eq!(store.get("decisionPath").unwrap().as_deref(), Some("[0,2,5]"));
        assert!(!temp.path().join("state/decisionPath.json.tmp").exists());
    }

    #[test]
    fn given_missing_key_when_get_or_clear_then_absent_without_error() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(Arc::new(RealFileSystem), temp.path());

        assert_eq!(store.get("decisionPath").unwrap(), None);
        store.clear("decisionPath").unwrap();
    }

    #[test]
    fn given_path_like_key_when_using_file_store_then_rejected() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(Arc::new(RealFileSystem), temp.path());

        let err = store.set("../escape", "[]").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn given_memory_store_when_cleared_then_value_gone() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v").unwrap();
        store.clear("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
