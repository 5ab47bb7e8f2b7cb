//! One pretty-printed JSON file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::infrastructure::ports::{PersistenceStore, StoreError};

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl PersistenceStore for JsonFileStore {
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(key, e))?;

        let bytes = serde_json::to_vec_pretty(value)?;
        // Staged write; the rename swaps the file in whole.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(|e| StoreError::io(key, e))?;
        fs::rename(&staging, &path).map_err(|e| StoreError::io(key, e))?;

        tracing::trace!(key = %key, path = %path.display(), "Saved state");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(key, e)),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let value = json!({"dungeonId": "forest_cave", "currentMonsterIndex": 4});

        JsonFileStore::new(dir.path())
            .save("current_dungeon", &value)
            .expect("save");

        let reopened = JsonFileStore::new(dir.path());
        assert_eq!(
            reopened.load("current_dungeon").expect("load"),
            Some(value)
        );
    }

    #[test]
    fn missing_key_loads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("not-yet-created"));
        assert_eq!(store.load("current_dungeon").expect("load"), None);
        store.remove("current_dungeon").expect("remove missing");
    }

    #[test]
    fn when_file_corrupted_returns_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("current_dungeon.json"), b"{ not json").expect("write");

        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load("current_dungeon"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn when_key_escapes_directory_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.save("../outside", &json!(1)),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
