//! Cheffy API server library.
//!
//! Backend for the Cheffy recipe chat: a session-gated JSON API that proxies
//! prompts to a chat-completion service under a per-caller window quota, and
//! persists the recipes users choose to keep.
//!
//! # Architecture
//!
//! - Axum web framework with `PostgreSQL`-backed sessions
//! - Chat completions forwarded inside a fixed instructional envelope
//! - Redis-backed fixed-window rate limiting keyed by caller email
//! - `PostgreSQL` for users and their saved recipes
//! - Sentry error tracking with tracing integration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod openai;
pub mod ratelimit;
pub mod routes;
pub mod services;
pub mod state;
