//! The single-slot store behind the cache.

use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Fixed identifier the entry is stored under in persistent backends.
pub const CACHE_KEY: &str = "site_content_cache";

/// The cached reference-content blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCacheEntry {
    /// Aggregated reference text.
    pub text: String,
    /// When the entry was last refreshed.
    pub updated_at: SystemTime,
}

impl ContentCacheEntry {
    /// Create an entry stamped with the current time.
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            updated_at: SystemTime::now(),
        }
    }
}

/// Storage for the single cache entry.
///
/// Abstracted so embeddings can persist the blob in a larger-capacity
/// store; concurrent writers are not mutually excluded, the last write
/// wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the stored entry, if any.
    async fn load(&self) -> Option<ContentCacheEntry>;

    /// Overwrite the stored entry.
    async fn save(&self, entry: ContentCacheEntry);
}

/// An in-memory single-slot store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entry: RwLock<Option<ContentCacheEntry>>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an entry.
    pub fn with_entry(entry: ContentCacheEntry) -> Self {
        Self {
            entry: RwLock::new(Some(entry)),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self) -> Option<ContentCacheEntry> {
        self.entry.read().await.clone()
    }

    async fn save(&self, entry: ContentCacheEntry) {
        *self.entry.write().await = Some(entry);
    }
}
