//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cheffy_core::{Email, Recipe, UserId};

/// A registered Cheffy user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's full name, as entered at signup.
    pub full_name: String,
    /// Preferred answer language (e.g., "English", "Spanish").
    pub language: String,
    /// Country, as entered at signup.
    pub country: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// A user profile with embedded recipes, as returned after a save.
///
/// The password hash never appears here; this is the full wire shape of
/// the `data` field in the save response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub language: String,
    pub country: String,
    pub recipes: Vec<Recipe>,
}

impl UserDocument {
    /// Assemble the wire document from a user and their recipes.
    #[must_use]
    pub fn new(user: User, recipes: Vec<Recipe>) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            language: user.language,
            country: user.country,
            recipes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_document_serializes_camel_case_without_hash() {
        let user = User {
            id: UserId::new(7),
            email: Email::parse("cook@example.com").unwrap(),
            full_name: "Test Cook".to_string(),
            language: "English".to_string(),
            country: "Portugal".to_string(),
            created_at: Utc::now(),
        };
        let document = UserDocument::new(user, vec![]);

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["fullName"], "Test Cook");
        assert_eq!(value["email"], "cook@example.com");
        assert_eq!(value["recipes"], serde_json::json!([]));
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
    }
}
