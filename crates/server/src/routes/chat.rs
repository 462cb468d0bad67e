//! Completion-proxy API handler.
//!
//! `POST /api/chatGpt` forwards an authenticated caller's prompt to the
//! completion API inside a fixed instructional envelope, charging one unit
//! of the caller's window quota per turn. Exhausted quota is a soft denial:
//! still HTTP 200, with the apology text where the completion would be.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::ratelimit::RateLimitDecision;
use crate::services::{ChatOutcome, ChatService, RATE_LIMIT_APOLOGY};
use crate::state::AppState;

const X_RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Build the chat router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/chatGpt", post(chat))
}

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatPrompt {
    pub prompt: String,
    /// Language the reply should be written in.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "English".to_string()
}

/// Response body for a chat turn.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Raw upstream completion body, or `{text}` carrying the apology when denied.
    pub json: Value,
    pub rate_limit_state: RateLimitDecision,
}

/// Run one chat turn for the logged-in caller.
///
/// POST /api/chatGpt
///
/// The caller's email keys the window quota, so the limit follows the
/// account across devices.
///
/// # Errors
///
/// Returns an error if the counter store is unreachable or the completion
/// API fails.
#[instrument(skip(user, state, body), fields(language = %body.language))]
pub async fn chat(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<ChatPrompt>,
) -> Result<Response> {
    let service = ChatService::new(state.openai(), state.limiter(), &state.config().openai.model);

    let outcome = service
        .respond(user.email.as_str(), &body.prompt, &body.language)
        .await?;

    Ok(shape_reply(outcome))
}

/// Shape a chat outcome into the wire reply.
///
/// Both outcomes are HTTP 200 and both carry the quota headers; the caller
/// tells them apart by the body alone.
fn shape_reply(outcome: ChatOutcome) -> Response {
    let (json, state) = match outcome {
        ChatOutcome::Answered { body, state } => (body, state),
        ChatOutcome::Throttled { state } => (json!({ "text": RATE_LIMIT_APOLOGY }), state),
    };

    let mut headers = HeaderMap::new();
    headers.insert(X_RATE_LIMIT_LIMIT, HeaderValue::from(state.limit));
    headers.insert(X_RATE_LIMIT_REMAINING, HeaderValue::from(state.remaining));

    (
        headers,
        Json(ChatReply {
            json,
            rate_limit_state: state,
        }),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn decision(allowed: bool, remaining: u32) -> RateLimitDecision {
        RateLimitDecision {
            allowed,
            limit: 5,
            remaining,
            reset_at: 1_700_000_060_000,
        }
    }

    #[tokio::test]
    async fn test_throttled_reply_carries_apology_and_headers() {
        let response = shape_reply(ChatOutcome::Throttled {
            state: decision(false, 0),
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "5");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["json"]["text"], RATE_LIMIT_APOLOGY);
        assert_eq!(body["rateLimitState"]["allowed"], false);
        assert_eq!(body["rateLimitState"]["remaining"], 0);
        assert_eq!(body["rateLimitState"]["resetAt"], 1_700_000_060_000_i64);
    }

    #[tokio::test]
    async fn test_answered_reply_passes_upstream_body_through() {
        let upstream = json!({
            "id": "chatcmpl-1",
            "choices": [{"message": {"role": "assistant", "content": "Preheat the oven."}}]
        });
        let response = shape_reply(ChatOutcome::Answered {
            body: upstream.clone(),
            state: decision(true, 4),
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "4");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["json"], upstream);
        assert_eq!(body["rateLimitState"]["allowed"], true);
    }

    #[test]
    fn test_prompt_language_defaults_to_english() {
        let prompt: ChatPrompt = serde_json::from_str(r#"{"prompt": "pancakes"}"#).unwrap();
        assert_eq!(prompt.language, "English");

        let prompt: ChatPrompt =
            serde_json::from_str(r#"{"prompt": "pancakes", "language": "Dutch"}"#).unwrap();
        assert_eq!(prompt.language, "Dutch");
    }
}
