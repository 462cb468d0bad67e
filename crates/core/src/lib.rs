//! Cheffy Core - Shared types library.
//!
//! This crate provides common types used across all Cheffy components:
//! - `server` - The recipe-chat HTTP API (completion proxy + persistence)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and parsing logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere, including in future native clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, recipe wire
//!   types, and the tolerant assistant-reply parser

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
