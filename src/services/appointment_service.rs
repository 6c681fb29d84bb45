//! Domain service for viewing appointments.
//!
//! Status changes follow a small state machine:
//! `pending → confirmed` (listing owner), `pending → cancelled` and
//! `confirmed → cancelled` (owner or booker). `cancelled` is terminal.

use serde_json::Value;
use thiserror::Error;

use crate::domain::AppointmentStatus;
use crate::models::Appointment;
use crate::validation::ValidationErrors;

/// Errors specific to appointment operations.
#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    NotFound(i32),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AppointmentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for AppointmentError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

#[async_trait::async_trait]
pub trait AppointmentService: Send + Sync {
    /// Books a viewing for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentError::Invalid`] if the payload fails validation,
    /// the property or user does not exist, or the date is in the past.
    async fn create(&self, user_id: i32, raw: &Value) -> Result<Appointment, AppointmentError>;

    /// Appointments booked by `user_id`.
    async fn list_booked(&self, user_id: i32) -> Result<Vec<Appointment>, AppointmentError>;

    /// Appointments on listings owned by `owner_id`.
    async fn list_received(&self, owner_id: i32) -> Result<Vec<Appointment>, AppointmentError>;

    /// Moves an appointment to the `status` given in `raw`.
    ///
    /// # Errors
    ///
    /// - [`AppointmentError::Forbidden`] if `actor_id` may not make this change.
    /// - [`AppointmentError::InvalidTransition`] if the state machine disallows it.
    async fn update_status(
        &self,
        actor_id: i32,
        id: i32,
        raw: &Value,
    ) -> Result<Appointment, AppointmentError>;
}
