use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState};
use crate::models::Agent;
use crate::services::AgentError;

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::NotFound(id) => Self::not_found("Agent", id),
            AgentError::Invalid(errors) => Self::InvalidInput(errors),
            AgentError::Database(msg) => Self::DatabaseError(msg),
            AgentError::Internal(msg) => Self::internal(msg),
        }
    }
}

pub async fn list_agents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Agent>>>, ApiError> {
    let agents = state.shared.agent_service.list().await?;
    Ok(Json(ApiResponse::success(agents)))
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Agent>>, ApiError> {
    let id = validate_id("agent", id)?;
    let agent = state.shared.agent_service.get(id).await?;
    Ok(Json(ApiResponse::success(agent)))
}

pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user_id): CurrentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let agent = state.shared.agent_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(agent))))
}
