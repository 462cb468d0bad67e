//! Tolerant parsing of assistant replies.
//!
//! The completion prompt asks the model to answer recipe requests with a JSON
//! object `{recipeTitle, recipeDescription, ingredients, instructions}` and
//! free text otherwise. The model does not always comply: keys can be honored
//! while `ingredients` arrives as a single string, or the reply can be plain
//! prose. Rendering must degrade to the raw text in every non-conforming
//! case, so [`RecipeReply::parse`] is infallible by construction.

use serde::Deserialize;
use serde_json::Value;

/// A structured recipe extracted from an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// What the presentation layer renders for one assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeReply {
    /// The reply honored the requested JSON shape.
    Card(RecipeCard),
    /// Anything else: the text is rendered as-is.
    Text(String),
}

/// The JSON shape requested by the system prompt.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    recipe_title: String,
    recipe_description: String,
    ingredients: StringOrList,
    instructions: StringOrList,
}

/// Accepts either a JSON string or an array of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_list(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(items) => items,
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::One(s) => s,
            Self::Many(items) => items.join("\n"),
        }
    }
}

impl RecipeReply {
    /// Parse one assistant message into a card or raw text.
    ///
    /// Never fails: any content that is not the requested JSON shape comes
    /// back as [`RecipeReply::Text`] with the input unchanged.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        match serde_json::from_str::<RawCard>(content.trim()) {
            Ok(raw) => Self::Card(RecipeCard {
                title: raw.recipe_title,
                description: raw.recipe_description,
                ingredients: raw.ingredients.into_list(),
                instructions: raw.instructions.into_text(),
            }),
            Err(_) => Self::Text(content.to_owned()),
        }
    }

    /// Parse the first choice of a raw chat-completion body, if present.
    #[must_use]
    pub fn from_completion(body: &Value) -> Option<Self> {
        completion_text(body).map(Self::parse)
    }
}

/// Extract the first choice's message content from a chat-completion body.
#[must_use]
pub fn completion_text(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_conforming_card() {
        let content = r#"{
            "recipeTitle": "Pad Thai",
            "recipeDescription": "Street-style noodles",
            "ingredients": ["rice noodles", "tamarind", "peanuts"],
            "instructions": "Soak the noodles, stir-fry everything, serve hot."
        }"#;

        let RecipeReply::Card(card) = RecipeReply::parse(content) else {
            panic!("expected a card");
        };
        assert_eq!(card.title, "Pad Thai");
        assert_eq!(card.ingredients.len(), 3);
        assert!(card.instructions.starts_with("Soak"));
    }

    #[test]
    fn test_parse_accepts_ingredients_as_single_string() {
        let content = json!({
            "recipeTitle": "Toast",
            "recipeDescription": "Bread, but warm",
            "ingredients": "2 slices of bread",
            "instructions": "Toast the bread."
        })
        .to_string();

        let RecipeReply::Card(card) = RecipeReply::parse(&content) else {
            panic!("expected a card");
        };
        assert_eq!(card.ingredients, vec!["2 slices of bread".to_owned()]);
    }

    #[test]
    fn test_parse_joins_instruction_steps() {
        let content = json!({
            "recipeTitle": "Rice",
            "recipeDescription": "Plain rice",
            "ingredients": ["1 cup rice"],
            "instructions": ["Rinse the rice.", "Boil 12 minutes."]
        })
        .to_string();

        let RecipeReply::Card(card) = RecipeReply::parse(&content) else {
            panic!("expected a card");
        };
        assert_eq!(card.instructions, "Rinse the rice.\nBoil 12 minutes.");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let content = "\n  {\"recipeTitle\":\"A\",\"recipeDescription\":\"B\",\"ingredients\":[\"c\"],\"instructions\":\"D\"}  \n";
        assert!(matches!(
            RecipeReply::parse(content),
            RecipeReply::Card(_)
        ));
    }

    #[test]
    fn test_parse_falls_back_to_raw_text() {
        let cases = [
            "I can only assist you with food recipes only.",
            "{not json at all",
            "42",
            "[\"a\",\"b\"]",
            "{\"recipeTitle\": \"missing the rest\"}",
            "",
        ];
        for content in cases {
            assert_eq!(
                RecipeReply::parse(content),
                RecipeReply::Text(content.to_owned()),
                "content should fall back: {content:?}"
            );
        }
    }

    #[test]
    fn test_from_completion_extracts_first_choice() {
        let body = json!({
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi there"}}
            ]
        });
        assert_eq!(
            RecipeReply::from_completion(&body),
            Some(RecipeReply::Text("Hi there".to_owned()))
        );
    }

    #[test]
    fn test_from_completion_missing_pieces() {
        assert_eq!(RecipeReply::from_completion(&json!({})), None);
        assert_eq!(
            RecipeReply::from_completion(&json!({"choices": []})),
            None
        );
        assert_eq!(
            RecipeReply::from_completion(&json!({"choices": [{"message": {}}]})),
            None
        );
        assert_eq!(
            RecipeReply::from_completion(&json!({"choices": [{"message": {"content": 7}}]})),
            None
        );
    }
}
