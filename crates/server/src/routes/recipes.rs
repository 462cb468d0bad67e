//! Recipe persistence API handlers.
//!
//! Saves are append-only: a save adds one entry to the matching user's
//! collection and returns the whole updated document. Nothing here ever
//! mutates or deletes an existing recipe.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use cheffy_core::{Email, Recipe, RecipeDraft};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::UserDocument;
use crate::state::AppState;

const SAVED_TEXT: &str = "Saved Recipe!";

/// Build the recipes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/saveRecipe", post(save_recipe))
        .route("/api/getRecipes", post(get_recipes))
}

/// Request body for saving a recipe.
#[derive(Debug, Deserialize)]
pub struct SaveRecipeRequest {
    pub email: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// Response body for a successful save.
#[derive(Debug, Serialize)]
pub struct SaveRecipeResponse {
    pub text: &'static str,
    pub data: UserDocument,
}

/// Request body for listing recipes.
#[derive(Debug, Deserialize)]
pub struct GetRecipesRequest {
    pub email: String,
}

/// Response body for a recipe listing.
#[derive(Debug, Serialize)]
pub struct GetRecipesResponse {
    pub recipes: Vec<Recipe>,
}

/// Append a recipe to the matching user's collection.
///
/// POST /api/saveRecipe
///
/// The target user comes from the request body, not the session; gating
/// only requires that some caller is logged in.
///
/// # Errors
///
/// Returns a conflict if no user matches the email or the store fails.
#[instrument(skip(_caller, state, body), fields(title = %body.title))]
pub async fn save_recipe(
    RequireUser(_caller): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<SaveRecipeRequest>,
) -> Result<(StatusCode, Json<SaveRecipeResponse>)> {
    let email = parse_target_email(&body.email)?;
    let draft = RecipeDraft {
        title: body.title,
        description: body.description,
        ingredients: body.ingredients,
        instructions: body.instructions,
    };

    let repo = UserRepository::new(state.pool());
    let data = repo.append_recipe(&email, &draft).await?;

    tracing::info!(count = data.recipes.len(), "recipe saved");

    Ok((
        StatusCode::CREATED,
        Json(SaveRecipeResponse {
            text: SAVED_TEXT,
            data,
        }),
    ))
}

/// List the recipes saved for a user, oldest first.
///
/// POST /api/getRecipes
///
/// # Errors
///
/// Returns a conflict if no user matches the email or the store fails.
#[instrument(skip(_caller, state, body))]
pub async fn get_recipes(
    RequireUser(_caller): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<GetRecipesRequest>,
) -> Result<Json<GetRecipesResponse>> {
    let email = parse_target_email(&body.email)?;

    let repo = UserRepository::new(state.pool());
    let recipes = repo.list_recipes(&email).await?;

    Ok(Json(GetRecipesResponse { recipes }))
}

/// An email that cannot parse cannot match a user, so the failure is the
/// same conflict the store reports for an unknown one.
fn parse_target_email(email: &str) -> Result<Email> {
    Email::parse(email).map_err(|_| AppError::Persistence(RepositoryError::NotFound))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_save_request_ignores_extra_fields() {
        let body = r#"{
            "email": "ada@example.com",
            "title": "Toast",
            "description": "Bread, but better",
            "ingredients": ["bread"],
            "instructions": "Toast the bread.",
            "timestamp": 1700000000000,
            "index": 0
        }"#;
        let parsed: SaveRecipeRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.title, "Toast");
        assert_eq!(parsed.ingredients, ["bread"]);
    }

    #[test]
    fn test_invalid_target_email_is_a_conflict() {
        let err = parse_target_email("not-an-email").unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
