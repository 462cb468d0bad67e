//! Recipe wire types.
//!
//! A recipe travels as `{timestamp, title, description, ingredients,
//! instructions}` with the timestamp in milliseconds since the epoch, the
//! shape the web client stores and renders. Ingredients keep their order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved recipe as returned by the list and save endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Creation time, epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub description: String,
    /// Ordered ingredient lines.
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// The caller-supplied fields of a recipe save.
///
/// The creation timestamp is assigned by the server at insert time, never
/// taken from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample() -> Recipe {
        Recipe {
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            title: "Tortilla de patatas".to_owned(),
            description: "Classic Spanish omelette".to_owned(),
            ingredients: vec!["4 eggs".to_owned(), "2 potatoes".to_owned()],
            instructions: "Fry the potatoes, beat the eggs, combine and set.".to_owned(),
        }
    }

    #[test]
    fn test_timestamp_serializes_as_epoch_millis() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["timestamp"], json!(1_700_000_000_000_i64));
        assert_eq!(value["ingredients"], json!(["4 eggs", "2 potatoes"]));
    }

    #[test]
    fn test_roundtrip_preserves_ingredient_order() {
        let recipe = sample();
        let json = serde_json::to_string(&recipe).unwrap();
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recipe);
        assert_eq!(back.ingredients.first().map(String::as_str), Some("4 eggs"));
    }

    #[test]
    fn test_draft_deserializes_from_client_body() {
        let draft: RecipeDraft = serde_json::from_value(json!({
            "title": "Ramen",
            "description": "Quick weeknight ramen",
            "ingredients": ["noodles", "broth"],
            "instructions": "Simmer the broth, cook the noodles, assemble."
        }))
        .unwrap();
        assert_eq!(draft.title, "Ramen");
        assert_eq!(draft.ingredients.len(), 2);
    }
}
