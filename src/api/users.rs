use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState};
use crate::models::{Property, User};

/// GET /users/me/saved
pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Property>>>, ApiError> {
    let properties = state.shared.user_service.list_saved(user_id).await?;
    Ok(Json(ApiResponse::success(properties)))
}

/// POST /users/me/saved/{property_id}
pub async fn save_property(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(property_id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let property_id = validate_id("property", property_id)?;
    let user = state
        .shared
        .user_service
        .save_property(user_id, property_id)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /users/me/saved/{property_id}
pub async fn unsave_property(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(property_id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let property_id = validate_id("property", property_id)?;
    let user = state
        .shared
        .user_service
        .unsave_property(user_id, property_id)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// GET /users/me/properties
pub async fn list_my_properties(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Property>>>, ApiError> {
    let properties = state
        .shared
        .property_service
        .list_by_owner(user_id)
        .await?;

    Ok(Json(ApiResponse::success(properties)))
}
