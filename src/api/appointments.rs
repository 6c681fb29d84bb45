use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState};
use crate::models::Appointment;
use crate::services::AppointmentError;

impl From<AppointmentError> for ApiError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound(id) => Self::not_found("Appointment", id),
            AppointmentError::Forbidden(msg) => Self::Forbidden(msg),
            e @ AppointmentError::InvalidTransition { .. } => Self::Conflict(e.to_string()),
            AppointmentError::Invalid(errors) => Self::InvalidInput(errors),
            AppointmentError::Database(msg) => Self::DatabaseError(msg),
            AppointmentError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentRole {
    /// Viewings the caller booked.
    #[default]
    Booker,
    /// Viewings on listings the caller owns.
    Owner,
}

#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    #[serde(default)]
    pub role: AppointmentRole,
}

/// GET /appointments?role=booker|owner
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, ApiError> {
    let service = &state.shared.appointment_service;
    let appointments = match query.role {
        AppointmentRole::Booker => service.list_booked(user_id).await?,
        AppointmentRole::Owner => service.list_received(user_id).await?,
    };

    Ok(Json(ApiResponse::success(appointments)))
}

/// POST /appointments
/// Books a viewing for the session user
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state
        .shared
        .appointment_service
        .create(user_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(appointment))))
}

/// PUT /appointments/{id}/status
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let id = validate_id("appointment", id)?;
    let appointment = state
        .shared
        .appointment_service
        .update_status(user_id, id, &payload)
        .await?;

    Ok(Json(ApiResponse::success(appointment)))
}
