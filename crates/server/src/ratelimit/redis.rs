//! Redis-backed counter store.
//!
//! Production backend for the completion quota. Counters live in Redis so
//! every server instance sees the same window, and each key carries its
//! TTL from the moment it is created.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};
use secrecy::{ExposeSecret, SecretString};

use super::store::{CounterStore, RateLimitError};

/// Increment and expiry set must land together, so both run inside one
/// script. The count comes back from the same round trip.
const INCR_SCRIPT: &str = r"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
return count
";

/// Shared counter store backed by Redis.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    script: Script,
}

impl RedisCounterStore {
    /// Connect to Redis and prepare the increment script.
    ///
    /// The connection manager reconnects on its own after network drops,
    /// so a transient Redis outage surfaces as per-request errors rather
    /// than a dead server.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the initial connection fails.
    pub async fn connect(redis_url: &SecretString) -> Result<Self, RateLimitError> {
        let client = Client::open(redis_url.expose_secret())?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            script: Script::new(INCR_SCRIPT),
        })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str, ttl: Duration) -> Result<u64, RateLimitError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        // ConnectionManager clones share one multiplexed connection
        let mut conn = self.conn.clone();
        let count: u64 = self
            .script
            .key(key)
            .arg(ttl_ms)
            .invoke_async(&mut conn)
            .await?;

        Ok(count)
    }
}
