//! Seed the database with a test user and one saved recipe.
//!
//! Useful for local development: gives you an account that can log in
//! immediately and already has a recipe in its collection.

use secrecy::SecretString;
use tracing::info;

use cheffy_core::{Email, RecipeDraft};
use cheffy_server::db::{self, UserRepository};
use cheffy_server::services::{AuthService, auth::Signup};

/// Create a user and append one sample recipe.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the user already
/// exists, or database operations fail.
pub async fn user(
    email: &str,
    password: &str,
    name: &str,
    language: &str,
    country: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("CHEFFY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "CHEFFY_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let auth = AuthService::new(&pool);
    let created = auth
        .signup(&Signup {
            email,
            full_name: name,
            password,
            language,
            country,
        })
        .await?;
    info!(user_id = %created.id, "User created");

    let parsed = Email::parse(email)?;
    let repo = UserRepository::new(&pool);
    let document = repo.append_recipe(&parsed, &sample_recipe()).await?;

    info!("Seeding complete!");
    info!("  Email: {}", created.email);
    info!("  Recipes: {}", document.recipes.len());

    Ok(())
}

fn sample_recipe() -> RecipeDraft {
    RecipeDraft {
        title: "Shakshuka".to_string(),
        description: "Eggs poached in a spiced tomato and pepper sauce.".to_string(),
        ingredients: vec![
            "6 eggs".to_string(),
            "1 can crushed tomatoes".to_string(),
            "2 red peppers".to_string(),
            "1 onion".to_string(),
            "2 tsp smoked paprika".to_string(),
        ],
        instructions: "Soften the onion and peppers, add the tomatoes and spices, simmer, \
                       then crack in the eggs and cover until just set."
            .to_string(),
    }
}
