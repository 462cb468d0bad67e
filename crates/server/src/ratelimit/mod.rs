//! Fixed-window rate limiting for the completion proxy.
//!
//! Every chat turn costs one unit against the caller's current window.
//! The window key embeds the window index, so moving into the next window
//! never needs a delete; old window keys simply age out via their TTL.
//! The count advances on every check, allowed or denied.

mod redis;
mod store;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

pub use self::redis::RedisCounterStore;
pub use store::{CounterStore, MemoryCounterStore, RateLimitError};

/// Outcome of a window check, serialized into every chat response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Whether this request fits inside the caller's current window.
    pub allowed: bool,
    /// Window capacity.
    pub limit: u32,
    /// Requests left in the window after this one.
    pub remaining: u32,
    /// Unix milliseconds when the current window closes.
    pub reset_at: i64,
}

/// Fixed-window limiter over a shared counter store.
pub struct FixedWindowLimiter {
    store: Arc<dyn CounterStore>,
    limit: u32,
    window_ms: i64,
    window: Duration,
}

impl FixedWindowLimiter {
    /// Create a limiter allowing `limit` checks per `window` per identity.
    ///
    /// Windows shorter than a millisecond are rounded up to one.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>, limit: u32, window: Duration) -> Self {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX).max(1);
        Self {
            store,
            limit,
            window_ms,
            window,
        }
    }

    /// Count one request against `identity`'s current window.
    ///
    /// Exactly one store round trip, shared by the allow and deny paths.
    ///
    /// # Errors
    ///
    /// Returns an error when the counter store is unreachable. Callers
    /// treat this as an internal failure; the limiter never fails open.
    pub async fn check(&self, identity: &str) -> Result<RateLimitDecision, RateLimitError> {
        self.check_at(identity, Utc::now().timestamp_millis()).await
    }

    async fn check_at(
        &self,
        identity: &str,
        now_ms: i64,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let window_index = now_ms.div_euclid(self.window_ms);
        let key = format!("ratelimit:{identity}:{window_index}");

        let count = self.store.incr(&key, self.window).await?;

        let allowed = count <= u64::from(self.limit);
        let remaining = u32::try_from(u64::from(self.limit).saturating_sub(count)).unwrap_or(0);
        let reset_at = (window_index + 1) * self.window_ms;

        Ok(RateLimitDecision {
            allowed,
            limit: self.limit,
            remaining,
            reset_at,
        })
    }
}
