use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_id, validate_limit};
use super::{ApiError, ApiResponse, AppState};
use crate::models::Property;
use crate::services::PropertyError;
use crate::validation::validate_filter;

impl From<PropertyError> for ApiError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::NotFound(id) => Self::not_found("Property", id),
            PropertyError::Forbidden(msg) => Self::Forbidden(msg),
            PropertyError::Conflict(msg) => Self::Conflict(msg),
            PropertyError::Invalid(errors) => Self::InvalidInput(errors),
            PropertyError::Database(msg) => Self::DatabaseError(msg),
            PropertyError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /properties
///
/// Every query parameter except `limit` is passed to the filter validator,
/// which ignores keys it does not know.
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<Property>>>, ApiError> {
    let max_page_size = state.config().read().await.listings.max_page_size;

    let mut raw = Map::new();
    let mut limit = None;
    for (key, value) in params {
        if key == "limit" {
            limit = Some(validate_limit(&value, max_page_size)?);
        } else {
            raw.insert(key, Value::String(value));
        }
    }

    let filter = validate_filter(&Value::Object(raw))?;
    let properties = state
        .shared
        .property_service
        .search(&filter, limit)
        .await?;

    Ok(Json(ApiResponse::success(properties)))
}

/// GET /properties/featured
pub async fn featured_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Property>>>, ApiError> {
    let properties = state.shared.property_service.featured().await?;
    Ok(Json(ApiResponse::success(properties)))
}

/// GET /properties/{id}
pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Property>>, ApiError> {
    let id = validate_id("property", id)?;
    let property = state.shared.property_service.get(id).await?;
    Ok(Json(ApiResponse::success(property)))
}

/// POST /properties
/// The session user becomes the owner
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .shared
        .property_service
        .create(user_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(property))))
}

/// PUT /properties/{id}/status
pub async fn update_property_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<Property>>, ApiError> {
    let id = validate_id("property", id)?;
    let property = state
        .shared
        .property_service
        .update_status(user_id, id, &payload)
        .await?;

    Ok(Json(ApiResponse::success(property)))
}

/// POST /properties/{id}/ratings
pub async fn rate_property(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<Property>>, ApiError> {
    let id = validate_id("property", id)?;
    let property = state
        .shared
        .property_service
        .rate(user_id, id, &payload)
        .await?;
    Ok(Json(ApiResponse::success(property)))
}
