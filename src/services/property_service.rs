//! Domain service for property listings.
//!
//! Covers search, featured listings, creation, status changes and ratings.

use serde_json::Value;
use thiserror::Error;

use crate::models::Property;
use crate::validation::{PropertyFilter, ValidationErrors};

/// Errors specific to property operations.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("Property not found: {0}")]
    NotFound(i32),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for PropertyError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PropertyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for PropertyError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

#[async_trait::async_trait]
pub trait PropertyService: Send + Sync {
    /// Runs a search, newest first. `limit` is capped at the configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Invalid`] if a bound cannot be parsed.
    async fn search(
        &self,
        filter: &PropertyFilter,
        limit: Option<u64>,
    ) -> Result<Vec<Property>, PropertyError>;

    async fn featured(&self) -> Result<Vec<Property>, PropertyError>;

    async fn get(&self, id: i32) -> Result<Property, PropertyError>;

    /// Creates a listing owned by `owner_id`. Any `userId` in the payload is
    /// replaced by the owner. The rating aggregate and `featured` always
    /// start from the configured defaults.
    async fn create(&self, owner_id: i32, raw: &Value) -> Result<Property, PropertyError>;

    /// Changes the listing status. Only the owner may do this.
    async fn update_status(
        &self,
        actor_id: i32,
        id: i32,
        raw: &Value,
    ) -> Result<Property, PropertyError>;

    /// Folds a score of 1 to 5 (read from `score`) into the listing's average.
    ///
    /// # Errors
    ///
    /// [`PropertyError::Forbidden`] when `rater_id` owns the listing and
    /// [`PropertyError::Conflict`] when they have already rated it.
    async fn rate(&self, rater_id: i32, id: i32, raw: &Value) -> Result<Property, PropertyError>;

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Property>, PropertyError>;
}
