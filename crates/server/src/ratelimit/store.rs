//! Counter storage backends for the fixed-window limiter.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a counter store.
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Counter store is unreachable or misbehaving.
    #[error("counter store error: {0}")]
    Store(#[from] redis::RedisError),
}

/// Abstract storage interface for window counters.
///
/// The limiter assumes a key-value model where the value is a hit count
/// scoped to one window. Implementations must make increment-and-read a
/// single atomic step across concurrent callers.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `key`, creating it with `ttl`
    /// on first touch, and return the post-increment count.
    async fn incr(&self, key: &str, ttl: Duration) -> Result<u64, RateLimitError>;
}

/// Simple in-memory counter store.
///
/// Single-process only, so quotas enforced through it do not hold across
/// replicas or restarts. Used by tests; production uses the Redis store.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    entries: Mutex<HashMap<String, CounterEntry>>,
}

#[derive(Debug)]
struct CounterEntry {
    count: u64,
    expires_at: Instant,
}

impl MemoryCounterStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str, ttl: Duration) -> Result<u64, RateLimitError> {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Expired entries are dropped lazily; the map stays small because
        // stale window keys all carry a TTL.
        entries.retain(|_, entry| entry.expires_at > now);

        let entry = entries.entry(key.to_string()).or_insert(CounterEntry {
            count: 0,
            expires_at: now + ttl,
        });
        entry.count += 1;
        Ok(entry.count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_incr_counts_up_per_key() {
        let store = MemoryCounterStore::new();
        let ttl = Duration::from_secs(60);

        assert_eq!(store.incr("a", ttl).await.unwrap(), 1);
        assert_eq!(store.incr("a", ttl).await.unwrap(), 2);
        assert_eq!(store.incr("b", ttl).await.unwrap(), 1);
        assert_eq!(store.incr("a", ttl).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_expired_entries_restart_from_one() {
        let store = MemoryCounterStore::new();
        let ttl = Duration::from_millis(20);

        assert_eq!(store.incr("a", ttl).await.unwrap(), 1);
        assert_eq!(store.incr("a", ttl).await.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.incr("a", ttl).await.unwrap(), 1);
    }
}
