//! Chat orchestration for the completion proxy.
//!
//! One caller turn costs one quota unit and at most one upstream call.
//! The quota check always runs first; a denied turn never reaches the
//! completion API.

use cheffy_core::RecipeReply;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::openai::{ChatMessage, ChatRequest, OpenAiClient, OpenAiError};
use crate::ratelimit::{FixedWindowLimiter, RateLimitDecision, RateLimitError};

/// Canned reply returned with HTTP 200 when a caller exhausts their window.
pub const RATE_LIMIT_APOLOGY: &str = "You're sending messages too fast! I have to power off for a bit. Come back in a few minutes!";

/// Greeting seeded into every conversation ahead of the caller's prompt.
const GREETING: &str = "Welcome! I am Cheffy. My job is to provide you with any recipe that you want. What are you in the mood for?";

const SEED_PROMPT: &str = "Hello";

const TEMPERATURE: f64 = 0.7;
const FREQUENCY_PENALTY: f64 = 0.0;
const PRESENCE_PENALTY: f64 = 0.0;
const MAX_TOKENS: u32 = 1000;
const COMPLETION_COUNT: u8 = 1;

/// Errors from a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Counter store failure during the quota check.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    /// Completion API failure after an allowed check.
    #[error(transparent)]
    Upstream(#[from] OpenAiError),
}

/// Outcome of one chat turn.
#[derive(Debug)]
pub enum ChatOutcome {
    /// The completion API answered; `body` is its raw response.
    Answered {
        body: Value,
        state: RateLimitDecision,
    },
    /// The caller's window is exhausted; no upstream call was made.
    Throttled { state: RateLimitDecision },
}

/// Chat service running quota checks and completion calls in order.
pub struct ChatService<'a> {
    openai: &'a OpenAiClient,
    limiter: &'a FixedWindowLimiter,
    model: &'a str,
}

impl<'a> ChatService<'a> {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(
        openai: &'a OpenAiClient,
        limiter: &'a FixedWindowLimiter,
        model: &'a str,
    ) -> Self {
        Self {
            openai,
            limiter,
            model,
        }
    }

    /// Run one chat turn for `identity`.
    ///
    /// A denied turn costs the caller a window unit but makes no upstream
    /// call; the caller sees the apology text instead of a completion.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::RateLimit` if the counter store is unreachable,
    /// `ChatError::Upstream` if the completion API fails.
    #[instrument(skip(self, prompt), fields(identity = %identity))]
    pub async fn respond(
        &self,
        identity: &str,
        prompt: &str,
        language: &str,
    ) -> Result<ChatOutcome, ChatError> {
        let state = self.limiter.check(identity).await?;
        if !state.allowed {
            info!("chat turn denied by window quota");
            return Ok(ChatOutcome::Throttled { state });
        }

        let request = build_envelope(self.model, prompt, language);
        let body = self.openai.chat_completion(&request).await?;
        observe_reply_shape(&body);

        Ok(ChatOutcome::Answered { body, state })
    }
}

/// Record whether the model honored the card contract for this turn.
///
/// The body is relayed unchanged either way; this only feeds the logs so
/// prompt drift shows up without inspecting raw completions.
fn observe_reply_shape(body: &Value) {
    match RecipeReply::from_completion(body) {
        Some(RecipeReply::Card(card)) => {
            debug!(title = %card.title, "assistant returned a recipe card");
        }
        Some(RecipeReply::Text(_)) => debug!("assistant returned free text"),
        None => warn!("completion body carried no message content"),
    }
}

/// Assemble the fixed four-turn envelope around the caller's prompt.
///
/// The seed turns never vary, so the assistant always opens from the same
/// persona no matter what the caller sends.
#[must_use]
pub fn build_envelope(model: &str, prompt: &str, language: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(system_prompt(language)),
            ChatMessage::user(SEED_PROMPT),
            ChatMessage::assistant(GREETING),
            ChatMessage::user(prompt),
        ],
        temperature: TEMPERATURE,
        frequency_penalty: FREQUENCY_PENALTY,
        presence_penalty: PRESENCE_PENALTY,
        max_tokens: MAX_TOKENS,
        n: COMPLETION_COUNT,
    }
}

fn system_prompt(language: &str) -> String {
    format!(
        "You are a bot called Cheffy that gives users any recipe they want in their language.\n\
         If the user asks a question for anything other than a recipe, tell them that you can only assist them with food recipes only.\n\
         Give the user step by step instructions on how to make the meal.\n\
         Respond with the users language in {language}.\n\
         If the user asks for any recipe, give your response in this JSON format only, and respond with absolutely nothing else:\n\
         {{\n\
         recipeTitle: recipe title translated to {language},\n\
         recipeDescription: recipe description translated to {language},\n\
         ingredients: ingredients translated to {language},\n\
         instructions: instructions translated to {language}\n\
         }}"
    )
}
