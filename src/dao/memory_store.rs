use std::{collections::HashMap, sync::Mutex};

use super::storage::{StorageBackend, StorageError, StorageResult};

/// Volatile preference backend; also stands in for disabled storage.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    disabled: bool,
}

impl MemoryStorage {
    /// Empty, writable storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every read and write, like a browser with storage turned off.
    pub fn disabled() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            disabled: true,
        }
    }

    /// Seed a raw value, bypassing serialization (useful to plant corrupted data).
    pub fn with_raw(self, key: &str, raw: &str) -> Self {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), raw.to_string());
        self
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        let values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip_until_disabled() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("theme").unwrap(), None);
        storage.write("theme", "\"dark\"").unwrap();
        assert_eq!(storage.read("theme").unwrap().as_deref(), Some("\"dark\""));

        let disabled = MemoryStorage::disabled();
        assert!(matches!(disabled.read("theme"), Err(StorageError::Disabled)));
        assert!(matches!(disabled.write("theme", "1"), Err(StorageError::Disabled)));
    }

    #[test]
    fn raw_seed_is_returned_verbatim() {
        let storage = MemoryStorage::new().with_raw("text-scale", "{not json");
        assert_eq!(storage.read("text-scale").unwrap().as_deref(), Some("{not json"));
    }
}
