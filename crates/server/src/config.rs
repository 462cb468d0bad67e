//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHEFFY_DATABASE_URL` - `PostgreSQL` connection string
//! - `CHEFFY_REDIS_URL` - Redis connection string for the rate-limit counters
//! - `CHEFFY_BASE_URL` - Public URL for the API
//! - `CHEFFY_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `OPENAI_API_KEY` - OpenAI API key for chat completions
//!
//! ## Optional
//! - `CHEFFY_HOST` - Bind address (default: 0.0.0.0)
//! - `CHEFFY_PORT` - Listen port (default: 3000)
//! - `CHEFFY_RATE_LIMIT_MAX` - Completions allowed per window (default: 5)
//! - `CHEFFY_RATE_LIMIT_WINDOW_SECS` - Window length in seconds (default: 60)
//! - `OPENAI_MODEL` - Completion model (default: gpt-3.5-turbo-0613)
//! - `OPENAI_BASE_URL` - Completion API base URL (default: <https://api.openai.com/v1>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry trace sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default completion model, pinned so upstream model churn never changes
/// answer shape underneath us.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-0613";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_RATE_LIMIT_MAX: &str = "5";
const DEFAULT_RATE_LIMIT_WINDOW_SECS: &str = "60";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Cheffy server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Redis connection URL for the rate-limit counter store (contains token)
    pub redis_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the API
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// OpenAI completion API configuration
    pub openai: OpenAiConfig,
    /// Per-caller completion quota configuration
    pub rate_limit: RateLimitConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry trace sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// OpenAI completion API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key for the completion endpoint
    pub api_key: SecretString,
    /// Model identifier sent with every completion request
    pub model: String,
    /// Base URL of the completion API
    pub base_url: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Fixed-window quota knobs for the completion proxy.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Completions allowed per window per caller
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Returns the window length as a [`Duration`].
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_url_with_fallback("CHEFFY_DATABASE_URL", "DATABASE_URL")?;
        let redis_url = get_url_with_fallback("CHEFFY_REDIS_URL", "REDIS_URL")?;
        let host = get_env_or_default("CHEFFY_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHEFFY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CHEFFY_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHEFFY_PORT".to_string(), e.to_string()))?;
        let base_url = get_base_url("CHEFFY_BASE_URL")?;
        let session_secret = get_validated_secret("CHEFFY_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "CHEFFY_SESSION_SECRET")?;

        let openai = OpenAiConfig::from_env()?;
        let rate_limit = RateLimitConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            redis_url,
            host,
            port,
            base_url,
            session_secret,
            openai,
            rate_limit,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl OpenAiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("OPENAI_API_KEY")?,
            model: get_env_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            base_url: get_env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
        })
    }
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_requests = get_env_or_default("CHEFFY_RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CHEFFY_RATE_LIMIT_MAX".to_string(), e.to_string())
            })?;
        let window_secs =
            get_env_or_default("CHEFFY_RATE_LIMIT_WINDOW_SECS", DEFAULT_RATE_LIMIT_WINDOW_SECS)
                .parse::<u64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "CHEFFY_RATE_LIMIT_WINDOW_SECS".to_string(),
                        e.to_string(),
                    )
                })?;
        if window_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CHEFFY_RATE_LIMIT_WINDOW_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_requests,
            window_secs,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a connection URL with fallback to a generic key (set by Fly.io attach).
fn get_url_with_fallback(primary_key: &str, fallback_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., CHEFFY_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to the generic key (e.g., DATABASE_URL set by Fly.io postgres attach)
    if let Ok(value) = std::env::var(fallback_key) {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get a required environment variable holding an absolute http(s) URL.
fn get_base_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    let parsed = url::Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected http or https URL, got scheme '{}'", parsed.scheme()),
        ));
    }
    // Keep the raw string; handlers only ever need prefix checks against it
    Ok(value)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
