//! Request types for the chat completion API.
//!
//! These types match the OpenAI Chat Completions API format. Response
//! bodies are relayed raw and never deserialized into typed structs.

use serde::Serialize;

/// A single turn in a completion conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// The role of the message sender ("system", "user" or "assistant").
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat completion endpoint.
///
/// Every field is always sent; the proxy pins its sampling parameters so
/// two deployments never drift apart.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use (e.g., "gpt-3.5-turbo-0613").
    pub model: String,
    /// Conversation messages, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Frequency penalty.
    pub frequency_penalty: f64,
    /// Presence penalty.
    pub presence_penalty: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Number of completions to generate.
    pub n: u8,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("a").role, "system");
        assert_eq!(ChatMessage::user("b").role, "user");
        assert_eq!(ChatMessage::assistant("c").role, "assistant");
    }

    #[test]
    fn test_chat_request_serializes_all_fields() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo-0613".to_string(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: 0.7,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens: 1000,
            n: 1,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo-0613");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hello");
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["frequency_penalty"], 0.0);
        assert_eq!(value["presence_penalty"], 0.0);
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["n"], 1);
    }
}
