//! Domain models for the Cheffy API.

pub mod session;
pub mod user;

pub use session::CurrentUser;
pub use user::{User, UserDocument};
