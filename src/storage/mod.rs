pub mod memory_cache;

pub use memory_cache::MemoryCacheStorage;

use async_trait::async_trait;
use thiserror::Error;

/// Failures a storage backend reports instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Value cannot be null. (Parameter 'key')")]
    InvalidKey,

    #[error("cache is full ({capacity} entries)")]
    CapacityExceeded { capacity: usize },
}

/// Trait that every key-value storage backend must implement.
///
/// Keys must be non-empty; every operation rejects a blank key with
/// [`StorageError::InvalidKey`] and logs it at error level.
#[async_trait]
pub trait StorageService<T>: Send + Sync {
    /// Stored value for `key`, or `None` if it was never set.
    async fn get_item(&self, key: &str) -> Result<Option<T>, StorageError>;

    /// Insert or overwrite the value for `key`.
    async fn update_item(&self, key: &str, value: T) -> Result<(), StorageError>;

    /// Delete the entry for `key`. Removing a missing key succeeds.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
