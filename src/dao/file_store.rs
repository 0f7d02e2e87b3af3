//! JSON-file preference backend living in the user's config directory.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use directories::ProjectDirs;
use tracing::debug;

use super::storage::{StorageBackend, StorageError, StorageResult};

const FILE_NAME: &str = "preferences.json";

/// Stores every preference in one JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles from this process.
    write_gate: Mutex<()>,
}

impl FileStorage {
    /// Use an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: Mutex::new(()),
        }
    }

    /// Platform config directory, e.g. `~/.config/party-games/preferences.json`.
    pub fn default_location() -> Option<Self> {
        let dirs = ProjectDirs::from("nl", "party-games", "party-games")?;
        Some(Self::new(dirs.config_dir().join(FILE_NAME)))
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                StorageError::unavailable(
                    format!("corrupted preferences file {}", self.path.display()),
                    err,
                )
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StorageError::unavailable(
                format!("failed to read {}", self.path.display()),
                err,
            )),
        }
    }

    fn save_atomic(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                StorageError::unavailable(format!("failed to create {}", parent.display()), err)
            })?;
        }

        let data = serde_json::to_vec_pretty(values)
            .map_err(|err| StorageError::unavailable("failed to encode preferences".into(), err))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|err| match err.kind() {
            ErrorKind::StorageFull => StorageError::QuotaExceeded,
            _ => StorageError::unavailable(format!("failed to write {}", tmp.display()), err),
        })?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            StorageError::unavailable(format!("failed to replace {}", self.path.display()), err)
        })
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let _gate = self
            .write_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // A corrupted file is replaced rather than blocking every future save.
        let mut values = self.load().unwrap_or_else(|err| {
            debug!(error = %err, "discarding unreadable preferences file");
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());
        self.save_atomic(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("party-games-{}-{}", name, uuid::Uuid::new_v4()))
            .join(FILE_NAME)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let storage = FileStorage::new(temp_path("missing"));
        assert_eq!(storage.read("theme").unwrap(), None);
    }

    #[test]
    fn write_then_read_survives_new_instance() {
        let path = temp_path("persist");
        FileStorage::new(&path).write("theme", "\"dark\"").unwrap();
        FileStorage::new(&path).write("text-scale", "1.25").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.read("theme").unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(reopened.read("text-scale").unwrap().as_deref(), Some("1.25"));
    }

    #[test]
    fn corrupted_file_is_an_error_and_is_replaced_on_write() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.read("theme").is_err());

        storage.write("theme", "\"light\"").unwrap();
        assert_eq!(storage.read("theme").unwrap().as_deref(), Some("\"light\""));
    }
}
