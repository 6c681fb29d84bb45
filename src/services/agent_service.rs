//! Domain service for agent profiles.

use serde_json::Value;
use thiserror::Error;

use crate::models::Agent;
use crate::validation::ValidationErrors;

/// Errors specific to agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AgentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for AgentError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

#[async_trait::async_trait]
pub trait AgentService: Send + Sync {
    /// All agents, highest rated first.
    async fn list(&self) -> Result<Vec<Agent>, AgentError>;

    async fn get(&self, id: i32) -> Result<Agent, AgentError>;

    async fn create(&self, raw: &Value) -> Result<Agent, AgentError>;
}
