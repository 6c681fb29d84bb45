use serde::{Deserialize, Serialize};

use crate::domain::AppointmentStatus;
use crate::entities::appointments;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i32,
    pub property_id: i32,
    pub user_id: i32,
    /// RFC 3339, UTC
    pub date: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl Appointment {
    /// Stored status. Unknown text reads as `pending`.
    #[must_use]
    pub fn status(&self) -> AppointmentStatus {
        self.status.parse().unwrap_or_default()
    }
}

impl From<appointments::Model> for Appointment {
    fn from(model: appointments::Model) -> Self {
        Self {
            id: model.id,
            property_id: model.property_id,
            user_id: model.user_id,
            date: model.date,
            message: model.message,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
