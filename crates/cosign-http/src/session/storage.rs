//! Durable client-side storage for session entries.

use crate::error::{ConsoleError, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// String-keyed durable storage.
///
/// `store` and `remove` act on a whole batch so that related entries are
/// written or erased together.
pub trait SessionStorage: Send + Sync + 'static {
    /// Entries present for `keys`; absent keys are simply missing from the map.
    fn load(&self, keys: &[&str]) -> Result<BTreeMap<String, String>>;
    fn store(&self, entries: &[(&str, &str)]) -> Result<()>;
    fn remove(&self, keys: &[&str]) -> Result<()>;
}

impl<S: SessionStorage> SessionStorage for std::sync::Arc<S> {
    fn load(&self, keys: &[&str]) -> Result<BTreeMap<String, String>> {
        (**self).load(keys)
    }

    fn store(&self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).store(entries)
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        (**self).remove(keys)
    }
}

/// JSON file backed storage, one file per console home.
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage at the standard session file inside `home`.
    pub fn in_home(home: &Path) -> Self {
        Self::new(cosign_common::session_path(home))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, keys: &[&str]) -> Result<BTreeMap<String, String>> {
        let _guard = self.lock.lock();
        let entries = cosign_common::load_entries(&self.path);
        Ok(entries
            .0
            .into_iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .collect())
    }

    fn store(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self.lock.lock();
        let mut current = cosign_common::load_entries(&self.path);
        for (k, v) in entries {
            current.0.insert((*k).to_string(), (*v).to_string());
        }
        cosign_common::save_entries(&self.path, &current)
            .map_err(|e| ConsoleError::Storage(format!("{:?}: {:#}", self.path, e)))
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.lock.lock();
        let mut current = cosign_common::load_entries(&self.path);
        let before = current.0.len();
        current.0.retain(|k, _| !keys.contains(&k.as_str()));
        if before == current.0.len() && !self.path.exists() {
            return Ok(());
        }
        cosign_common::save_entries(&self.path, &current)
            .map_err(|e| ConsoleError::Storage(format!("{:?}: {:#}", self.path, e)))
    }
}

/// In-process storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage, e.g. to simulate a previous process.
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let storage = Self::new();
        {
            let mut map = storage.entries.lock();
            for (k, v) in entries {
                map.insert((*k).to_string(), (*v).to_string());
            }
        }
        storage
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, keys: &[&str]) -> Result<BTreeMap<String, String>> {
        let map = self.entries.lock();
        Ok(map
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn store(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries.lock();
        for (k, v) in entries {
            map.insert((*k).to_string(), (*v).to_string());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.entries.lock();
        for k in keys {
            map.remove(*k);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_batch_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_home(dir.path());

        storage
            .store(&[("token", "abc"), ("userId", "u1"), ("username", "alice")])
            .unwrap();
        let loaded = storage.load(&["token", "userId"]).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["token"], "abc");

        storage.remove(&["token", "userId", "username"]).unwrap();
        assert!(storage.load(&["token"]).unwrap().is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_keeps_unrelated_entries() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_home(dir.path());
        storage.store(&[("theme", "dark"), ("token", "abc")]).unwrap();
        storage.remove(&["token"]).unwrap();
        assert_eq!(storage.load(&["theme"]).unwrap()["theme"], "dark");
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        FileStorage::in_home(dir.path())
            .store(&[("token", "abc")])
            .unwrap();
        let reopened = FileStorage::in_home(dir.path());
        assert_eq!(reopened.load(&["token"]).unwrap()["token"], "abc");
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::with_entries(&[("token", "abc")]);
        assert_eq!(storage.load(&["token", "userId"]).unwrap().len(), 1);
        storage.remove(&["token"]).unwrap();
        assert!(storage.snapshot().is_empty());
    }
}
