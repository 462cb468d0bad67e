//! OpenAI chat completion integration for the recipe proxy.
//!
//! The server forwards one completion request per chat turn and relays the
//! provider's JSON body to the caller untouched, so only the request side
//! is typed here.

pub mod client;
pub mod error;
pub mod types;

pub use client::OpenAiClient;
pub use error::OpenAiError;
pub use types::{ChatMessage, ChatRequest};
