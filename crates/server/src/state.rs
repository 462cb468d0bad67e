//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::openai::OpenAiClient;
use crate::ratelimit::{CounterStore, FixedWindowLimiter};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    openai: OpenAiClient,
    limiter: FixedWindowLimiter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The completion client and the window limiter are built once here and
    /// shared by every request, mirroring the process-wide clients the
    /// handlers expect.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool, counter_store: Arc<dyn CounterStore>) -> Self {
        let openai = OpenAiClient::new(&config.openai);
        let limiter = FixedWindowLimiter::new(
            counter_store,
            config.rate_limit.max_requests,
            config.rate_limit.window(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                openai,
                limiter,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the completion API client.
    #[must_use]
    pub fn openai(&self) -> &OpenAiClient {
        &self.inner.openai
    }

    /// Get a reference to the per-identity window limiter.
    #[must_use]
    pub fn limiter(&self) -> &FixedWindowLimiter {
        &self.inner.limiter
    }
}
