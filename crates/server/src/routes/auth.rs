//! Account and session API handlers.
//!
//! Signup creates the account only; the caller logs in afterwards to get a
//! session cookie. Logout without a session is a no-op success.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthService, auth::Signup};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Request body for account creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub language: String,
    pub country: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for successful account and session actions.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: &'static str,
}

/// Create a new account.
///
/// POST /api/auth/signup
///
/// # Errors
///
/// Returns a validation error for a malformed email or weak password, a
/// conflict if the email is already registered.
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .signup(&Signup {
            email: &body.email,
            full_name: &body.full_name,
            password: &body.password,
            language: &body.language,
            country: &body.country,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: "Signed up successfully!",
        }),
    ))
}

/// Log in and start a session.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns the same credential failure for an unknown email and a wrong
/// password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SuccessResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email,
    };
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %current.id, "user logged in");

    Ok(Json(SuccessResponse {
        success: "Logged in successfully!",
    }))
}

/// End the session.
///
/// POST /api/auth/logout
///
/// # Errors
///
/// Returns an error if the session store fails while clearing.
#[instrument(skip(user, session))]
pub async fn logout(
    OptionalUser(user): OptionalUser,
    session: Session,
) -> Result<Json<SuccessResponse>> {
    if let Some(user) = user {
        clear_current_user(&session).await?;
        session.flush().await?;
        crate::error::clear_sentry_user();
        tracing::info!(user_id = %user.id, "user logged out");
    }

    Ok(Json(SuccessResponse {
        success: "Logged out successfully!",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_uses_camel_case() {
        let body = r#"{
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "correct horse",
            "language": "English",
            "country": "UK"
        }"#;
        let parsed: SignupRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.full_name, "Ada Lovelace");
        assert_eq!(parsed.country, "UK");
    }

    #[test]
    fn test_success_response_shape() {
        let value = serde_json::to_value(SuccessResponse {
            success: "Logged in successfully!",
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"success": "Logged in successfully!"}));
    }
}
