//! Key/value cache capability used to seed preference and status state.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{future::Cache as MokaInner, Expiry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key is not present. Callers treat this as a normal outcome.
    #[error("cache key not present")]
    Missing,
    #[error("cache backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<String, CacheError>;
    /// Store `value` under `key`; `ttl = None` keeps it until evicted.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError>;
}

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// In-process cache backed by moka with per-entry expiry.
///
/// # Examples
/// ```
/// use service::cache::{Cache, CacheError, MokaCache};
/// let cache = MokaCache::new(16);
/// tokio_test::block_on(async {
///     assert_eq!(cache.get("store_prefs").await, Err(CacheError::Missing));
///     cache.set("room_1_status", "0".into(), None).await.unwrap();
///     assert_eq!(cache.get("room_1_status").await.unwrap(), "0");
/// });
/// ```
#[derive(Clone)]
pub struct MokaCache {
    inner: MokaInner<String, Entry>,
}

impl MokaCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = MokaInner::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();
        Self { inner }
    }
}

#[async_trait]
impl Cache for MokaCache {
    async fn get(&self, key: &str) -> Result<String, CacheError> {
        self.inner.get(key).await.map(|e| e.value).ok_or(CacheError::Missing)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.inner.insert(key.to_string(), Entry { value, ttl }).await;
        Ok(())
    }
}
