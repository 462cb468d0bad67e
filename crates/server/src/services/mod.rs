//! Business logic services for the Cheffy API.
//!
//! # Services
//!
//! - `auth` - Signup and login with argon2 password hashing
//! - `chat` - Quota-gated completion proxy orchestration

pub mod auth;
pub mod chat;

pub use auth::{AuthError, AuthService};
pub use chat::{ChatError, ChatOutcome, ChatService, RATE_LIMIT_APOLOGY};
