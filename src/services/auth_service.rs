//! Domain service for authentication.
//!
//! Verifies credentials and resolves the session user. Registration lives in
//! [`crate::services::UserService`].

use thiserror::Error;

use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong
    /// password; the two cases are indistinguishable to the caller.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves the user behind a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the user no longer exists.
    async fn current_user(&self, user_id: i32) -> Result<User, AuthError>;
}
