//! User and recipe repository.
//!
//! All queries use the sqlx runtime API so the workspace builds without a
//! live database. Row structs derive `FromRow` and convert into domain
//! types, surfacing bad stored data as `RepositoryError::DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use cheffy_core::{Email, Recipe, RecipeDraft, RecipeId, UserId};

use super::RepositoryError;
use crate::models::user::{User, UserDocument};

/// Row shape shared by the user queries.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    full_name: String,
    language: String,
    country: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email,
            full_name: self.full_name,
            language: self.language,
            country: self.country,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(sqlx::FromRow)]
struct RecipeRow {
    title: String,
    description: String,
    ingredients: Vec<String>,
    instructions: String,
    created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            timestamp: row.created_at,
            title: row.title,
            description: row.description,
            ingredients: row.ingredients,
            instructions: row.instructions,
        }
    }
}

/// Recipes are returned oldest first so new saves always land at the end.
const SELECT_RECIPES: &str = r"
    SELECT title, description, ingredients, instructions, created_at
    FROM recipes
    WHERE user_id = $1
    ORDER BY created_at ASC, id ASC
";

/// Repository for user and recipe database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, full_name, language, country, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, password_hash), fields(email = %email))]
    pub async fn create(
        &self,
        email: &Email,
        full_name: &str,
        password_hash: &str,
        language: &str,
        country: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (email, full_name, password_hash, language, country)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, full_name, language, country, created_at
            ",
        )
        .bind(email.as_str())
        .bind(full_name)
        .bind(password_hash)
        .bind(language)
        .bind(country)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<PasswordRow> = sqlx::query_as(
            r"
            SELECT id, email, full_name, language, country, created_at, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = r.user.into_user()?;
        Ok(Some((user, r.password_hash)))
    }

    /// Append a recipe to a user's collection and return the updated document.
    ///
    /// The insert and the re-read run in one transaction so the returned
    /// document always contains the recipe just saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user matches the email.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, draft), fields(email = %email, title = %draft.title))]
    pub async fn append_recipe(
        &self,
        email: &Email,
        draft: &RecipeDraft,
    ) -> Result<UserDocument, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, full_name, language, country, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let user = row.ok_or(RepositoryError::NotFound)?.into_user()?;

        let recipe_id: RecipeId = sqlx::query_scalar(
            r"
            INSERT INTO recipes (user_id, title, description, ingredients, instructions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(user.id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.ingredients)
        .bind(&draft.instructions)
        .fetch_one(&mut *tx)
        .await?;
        debug!(recipe_id = %recipe_id, "Inserted recipe");

        let rows: Vec<RecipeRow> = sqlx::query_as(SELECT_RECIPES)
            .bind(user.id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let recipes = rows.into_iter().map(Recipe::from).collect();
        Ok(UserDocument::new(user, recipes))
    }

    /// Get all recipes saved by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user matches the email.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn list_recipes(&self, email: &Email) -> Result<Vec<Recipe>, RepositoryError> {
        let user = self
            .get_by_email(email)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let rows: Vec<RecipeRow> = sqlx::query_as(SELECT_RECIPES)
            .bind(user.id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }
}
