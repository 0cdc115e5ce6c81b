use crate::error::StorageError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

const SLOT_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".json.tmp";

/// String-keyed slots holding whole serialized snapshots.
///
/// Operations are synchronous; a store built on top of a backend is the only
/// code expected to write to it.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing slot is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// One `<key>.json` file per slot inside a single directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        debug!("File storage opened at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, SLOT_EXTENSION)))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(io_error(key))?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).map_err(io_error(key))?;
        if let Err(e) = std::fs::rename(&temp_path, &path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(io_error(key)(e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let dir_key = self.dir.display().to_string();
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&dir_key)(e)),
        };

        let mut keys = Vec::new();
        for entry in read_dir {
            let path = entry.map_err(io_error(&dir_key))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let keys = self.keys()?;
        for key in &keys {
            self.remove(key)?;
        }
        let stale = self.sweep_temp_files()?;
        if stale > 0 {
            debug!("Removed {} leftover temp file(s) in {:?}", stale, self.dir);
        }
        info!("Cleared {} storage slot(s) in {:?}", keys.len(), self.dir);
        Ok(())
    }
}

impl FileStorage {
    /// Delete `<key>.json.tmp` files left by interrupted writes
    fn sweep_temp_files(&self) -> Result<usize, StorageError> {
        let dir_key = self.dir.display().to_string();
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(io_error(&dir_key)(e)),
        };

        let mut removed = 0;
        for entry in read_dir {
            let path = entry.map_err(io_error(&dir_key))?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let is_temp = name
                .strip_suffix(TEMP_SUFFIX)
                .is_some_and(|stem| validate_key(stem).is_ok());
            if is_temp && path.is_file() {
                std::fs::remove_file(&path).map_err(io_error(name))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Process-local slots. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        let mut keys: Vec<String> = slots.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("watchlist").is_ok());
        assert!(validate_key("continueWatching").is_ok());
        assert!(validate_key("user_settings-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }

    #[test]
    fn test_file_storage_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.get("watchlist").unwrap(), None);
        storage.set("watchlist", "[]").unwrap();
        assert_eq!(storage.get("watchlist").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("watchlist.json").exists());
        assert!(!dir.path().join("watchlist.json.tmp").exists());

        storage.remove("watchlist").unwrap();
        assert_eq!(storage.get("watchlist").unwrap(), None);
        // Removing again is fine
        storage.remove("watchlist").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_bad_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(matches!(storage.set("../x", "[]"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.get("a/b"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_file_storage_clear_leaves_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.set("watchlist", "[]").unwrap();
        storage.set("downloads", "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["downloads".to_string(), "watchlist".to_string()]);
        storage.clear().unwrap();

        assert!(storage.keys().unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_file_storage_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        // A non-empty directory where the slot file should go makes the rename fail
        let blocker = dir.path().join("watchlist.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("inner"), "x").unwrap();

        let result = storage.set("watchlist", "[]");

        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(!dir.path().join("watchlist.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_clear_sweeps_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.set("watchlist", "[]").unwrap();
        std::fs::write(dir.path().join("downloads.json.tmp"), "[{\"id\":1").unwrap();
        std::fs::write(dir.path().join("notes.tmp"), "keep me").unwrap();

        storage.clear().unwrap();

        assert!(!dir.path().join("downloads.json.tmp").exists());
        assert!(!dir.path().join("watchlist.json").exists());
        assert!(dir.path().join("notes.tmp").exists());
    }

    #[test]
    fn test_file_storage_recreates_missing_dir_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let slots = dir.path().join("slots");
        let storage = FileStorage::new(&slots).unwrap();
        std::fs::remove_dir_all(&slots).unwrap();

        assert!(storage.keys().unwrap().is_empty());
        storage.set("downloads", "[]").unwrap();
        assert_eq!(storage.get("downloads").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set("b", "2").unwrap();
        storage.set("a", "1").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);

        storage.clear().unwrap();
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_memory_storage_rejects_bad_keys() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.get("../x"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.remove("a b"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(storage.set("", "[]"), Err(StorageError::InvalidKey(_))));
    }
}
