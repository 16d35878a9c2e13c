// In-process caches: rendered pages and reference lists

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod middleware;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Invalid TTL")]
    InvalidTTL,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: String, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Instant::now() >= expires_at)
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;
}

const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Expiring key/value store shared across requests.
///
/// Holds at most `max_entries` keys. Inserting a new key into a full store
/// first drops expired entries, then the entry closest to expiry.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    store: Arc<DashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    fn make_room(&self) {
        self.store.retain(|_, entry| !entry.is_expired());
        if self.store.len() < self.max_entries {
            return;
        }

        let victim = self
            .store
            .iter()
            .min_by_key(|entry| entry.expires_at.map_or((1, None), |at| (0, Some(at))))
            .map(|entry| entry.key().clone());
        if let Some(key) = victim {
            self.store.remove(&key);
            metrics::counter!("auroom.cache.evicted", 1);
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Reads and deserializes a JSON value; expired or undecodable entries read as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get(key).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(err) => {
                    tracing::warn!(key, error = %err, "dropping undecodable cache entry");
                    self.store.remove(key);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTTL);
        }
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, Some(ttl)).await
    }
}

#[async_trait::async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let expired = match self.store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.store.remove_if(key, |_, entry| entry.is_expired());
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        if self.store.len() >= self.max_entries && !self.store.contains_key(key) {
            self.make_room();
        }
        self.store
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        Ok(())
    }
}
