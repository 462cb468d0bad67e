//! HTTP route handlers for the Cheffy API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health             - Liveness check
//! GET  /health/ready       - Readiness check (database connectivity)
//!
//! # Chat
//! POST /api/chatGpt        - Quota-gated completion proxy (requires auth)
//!
//! # Recipes
//! POST /api/saveRecipe     - Append a recipe to a user's collection (requires auth)
//! POST /api/getRecipes     - List a user's saved recipes (requires auth)
//!
//! # Auth
//! POST /api/auth/signup    - Create an account
//! POST /api/auth/login     - Start a session
//! POST /api/auth/logout    - End the session
//! ```

pub mod auth;
pub mod chat;
pub mod health;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the API server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(chat::router())
        .merge(recipes::router())
        .merge(auth::router())
}
