//! Domain service for user accounts and saved listings.

use serde_json::Value;
use thiserror::Error;

use crate::models::{Property, User};
use crate::validation::ValidationErrors;

/// Errors specific to user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Property not found: {0}")]
    PropertyNotFound(i32),

    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    /// A unique column (`username` or `email`) is already taken.
    #[error("{field} is already taken")]
    Conflict { field: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Validates a registration payload, hashes the password and stores the user.
    ///
    /// # Errors
    ///
    /// - [`UserError::Invalid`] if the payload fails validation or the
    ///   password is too short.
    /// - [`UserError::Conflict`] if the username or email is taken.
    async fn register(&self, raw: &Value) -> Result<User, UserError>;

    async fn get_user(&self, user_id: i32) -> Result<User, UserError>;

    /// Saved listings in the order they were saved.
    async fn list_saved(&self, user_id: i32) -> Result<Vec<Property>, UserError>;

    /// Adds a listing to the saved list. Saving twice is a no-op.
    async fn save_property(&self, user_id: i32, property_id: i32) -> Result<User, UserError>;

    /// Removes a listing from the saved list. Removing an absent id is a no-op.
    async fn unsave_property(&self, user_id: i32, property_id: i32) -> Result<User, UserError>;
}
