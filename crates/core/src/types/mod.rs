//! Core types for Cheffy.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod recipe;
pub mod reply;

pub use email::{Email, EmailError};
pub use id::*;
pub use recipe::{Recipe, RecipeDraft};
pub use reply::{RecipeCard, RecipeReply};
