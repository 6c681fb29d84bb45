use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;

use crate::domain::AppointmentStatus;
use crate::entities::{appointments, prelude::*, properties};
use crate::models::Appointment;
use crate::validation::NewAppointment;

pub struct AppointmentRepository {
    conn: DatabaseConnection,
}

impl AppointmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, appointment: &NewAppointment) -> Result<Appointment> {
        let active = appointments::ActiveModel {
            property_id: Set(appointment.property_id),
            user_id: Set(appointment.user_id),
            date: Set(appointment.date.to_rfc3339()),
            message: Set(appointment.message.clone()),
            status: Set(appointment.status.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert appointment")?;

        Ok(Appointment::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Appointment>> {
        let model = Appointments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query appointment by ID")?;

        Ok(model.map(Appointment::from))
    }

    /// Appointments booked by `user_id`, soonest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Appointment>> {
        let rows = Appointments::find()
            .filter(appointments::Column::UserId.eq(user_id))
            .order_by_asc(appointments::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to query appointments for user")?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Appointments on any listing owned by `owner_id`, soonest first.
    pub async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Appointment>> {
        let rows = Appointments::find()
            .join(JoinType::InnerJoin, appointments::Relation::Property.def())
            .filter(properties::Column::UserId.eq(owner_id))
            .order_by_asc(appointments::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to query appointments for owner")?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let Some(model) = Appointments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query appointment for status update")?
        else {
            return Ok(None);
        };

        let mut active: appointments::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        let model = active.update(&self.conn).await?;

        Ok(Some(Appointment::from(model)))
    }
}
