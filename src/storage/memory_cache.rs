//! Process-local key-value cache backing the scoreboard snapshot.
//!
//! Clones share the same underlying map, so several services handed the same
//! cache observe each other's writes. Entries are only dropped by an explicit
//! `remove_item`; a bounded cache refuses new keys once full instead of
//! evicting.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use super::{StorageError, StorageService};

/// Thread-safe, in-memory string cache.
#[derive(Clone, Default)]
pub struct MemoryCacheStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
    capacity: Option<usize>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that holds at most `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryCacheStorage {
            entries: Arc::new(RwLock::new(HashMap::with_capacity(capacity))),
            capacity: Some(capacity),
        }
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if key.trim().is_empty() {
        let err = StorageError::InvalidKey;
        error!("{}", err);
        return Err(err);
    }
    Ok(())
}

#[async_trait]
impl StorageService<String> for MemoryCacheStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn update_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        check_key(key)?;
        let mut entries = self.entries.write().await;
        if let Some(capacity) = self.capacity {
            if entries.len() >= capacity && !entries.contains_key(key) {
                let err = StorageError::CapacityExceeded { capacity };
                error!("Cannot store '{}': {}", key, err);
                return Err(err);
            }
        }
        debug!("MemoryCache: set '{}' ({} bytes)", key, value.len());
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        if self.entries.write().await.remove(key).is_some() {
            debug!("MemoryCache: removed '{}'", key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCHES_KEY: &str = "FootballScoreBoard";

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let cache = MemoryCacheStorage::new();
        assert_eq!(cache.get_item(MATCHES_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let cache = MemoryCacheStorage::new();
        cache
            .update_item("footballMatches", "[1, 2, 4]".to_string())
            .await
            .unwrap();
        assert_eq!(
            cache.get_item("footballMatches").await,
            Ok(Some("[1, 2, 4]".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_overwrites_existing_value() {
        let cache = MemoryCacheStorage::new();
        cache.update_item(MATCHES_KEY, "[]".to_string()).await.unwrap();
        cache
            .update_item(MATCHES_KEY, "[{ property: value }]".to_string())
            .await
            .unwrap();
        assert_eq!(
            cache.get_item(MATCHES_KEY).await,
            Ok(Some("[{ property: value }]".to_string()))
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cache = MemoryCacheStorage::new();
        cache.update_item("hockeyMatches", "{}".to_string()).await.unwrap();

        assert_eq!(cache.remove_item("hockeyMatches").await, Ok(()));
        assert_eq!(cache.remove_item("hockeyMatches").await, Ok(()));
        assert_eq!(cache.remove_item("footballMatches").await, Ok(()));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_key_rejected_by_every_operation() {
        let cache = MemoryCacheStorage::new();
        assert_eq!(cache.get_item("").await, Err(StorageError::InvalidKey));
        assert_eq!(
            cache.update_item("  ", "value".to_string()).await,
            Err(StorageError::InvalidKey)
        );
        assert_eq!(cache.remove_item("").await, Err(StorageError::InvalidKey));
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_invalid_key_message() {
        assert_eq!(
            StorageError::InvalidKey.to_string(),
            "Value cannot be null. (Parameter 'key')"
        );
    }

    #[tokio::test]
    async fn test_bounded_cache_rejects_new_keys_when_full() {
        let cache = MemoryCacheStorage::with_capacity(1);
        cache.update_item("a", "1".to_string()).await.unwrap();

        assert_eq!(
            cache.update_item("b", "2".to_string()).await,
            Err(StorageError::CapacityExceeded { capacity: 1 })
        );
        // Overwriting an existing key is still allowed
        assert_eq!(cache.update_item("a", "3".to_string()).await, Ok(()));
        assert_eq!(cache.get_item("a").await, Ok(Some("3".to_string())));

        // Freed slots can be reused
        cache.remove_item("a").await.unwrap();
        assert_eq!(cache.update_item("b", "2".to_string()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = MemoryCacheStorage::new();
        let other = cache.clone();
        cache.update_item(MATCHES_KEY, "{}".to_string()).await.unwrap();
        assert_eq!(other.get_item(MATCHES_KEY).await, Ok(Some("{}".to_string())));
    }
}
