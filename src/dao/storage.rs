use std::error::Error;
use thiserror::Error;

/// Result alias for preference storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by preference backends regardless of where values live.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("preference storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("preference storage is disabled")]
    Disabled,
    #[error("preference storage quota exceeded")]
    QuotaExceeded,
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Raw string key/value storage backing the preference store.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value stored under `key`, `Ok(None)` when never written.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    /// Store `value` under `key`, overwriting any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
}
