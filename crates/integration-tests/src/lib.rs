//! Integration tests for Cheffy.
//!
//! # Running Tests
//!
//! ```bash
//! # Start Postgres and Redis, then apply migrations
//! cargo run -p cheffy-cli -- migrate
//!
//! # Start the API server
//! cargo run -p cheffy-server
//!
//! # Run the tests against it
//! cargo test -p cheffy-integration-tests -- --ignored
//! ```
//!
//! All tests are `#[ignore]`d by default because they drive a running
//! server over HTTP. Each test creates its own throwaway user, so repeated
//! runs against the same database never collide.

use reqwest::Client;
use uuid::Uuid;

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CHEFFY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client with a cookie store, so the session cookie sticks.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email per call, so repeated runs never collide.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

/// Sign up and log in a fresh user on `client`; returns the email.
///
/// # Panics
///
/// Panics if signup or login does not succeed.
pub async fn signup_and_login(client: &Client) -> String {
    let email = unique_email();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&serde_json::json!({
            "fullName": "Integration Test",
            "email": email,
            "password": "integration-secret",
            "language": "English",
            "country": "US",
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), 201, "signup should succeed");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": "integration-secret" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), 200, "login should succeed");

    email
}
