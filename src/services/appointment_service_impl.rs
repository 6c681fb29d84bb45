//! `SeaORM` implementation of the `AppointmentService` trait.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::db::Store;
use crate::domain::AppointmentStatus;
use crate::models::Appointment;
use crate::services::appointment_service::{AppointmentError, AppointmentService};
use crate::validation::{
    CanonicalEntity, EntityDefaults, EntityKind, FieldReader, ValidationErrors,
    validate_insert_with,
};

pub struct SeaOrmAppointmentService {
    store: Store,
    defaults: EntityDefaults,
}

impl SeaOrmAppointmentService {
    #[must_use]
    pub const fn new(store: Store, defaults: EntityDefaults) -> Self {
        Self { store, defaults }
    }
}

/// Who is asking, relative to one appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Owner,
    Booker,
    Stranger,
}

fn may_request(party: Party, next: AppointmentStatus) -> bool {
    match next {
        AppointmentStatus::Confirmed => party == Party::Owner,
        AppointmentStatus::Cancelled | AppointmentStatus::Pending => party != Party::Stranger,
    }
}

#[async_trait]
impl AppointmentService for SeaOrmAppointmentService {
    async fn create(&self, user_id: i32, raw: &Value) -> Result<Appointment, AppointmentError> {
        let mut payload = raw.clone();
        if let Some(map) = payload.as_object_mut() {
            map.insert("userId".to_string(), Value::from(user_id));
        }

        let CanonicalEntity::Appointment(appointment) =
            validate_insert_with(EntityKind::Appointment, &payload, &self.defaults)?
        else {
            return Err(AppointmentError::Internal(
                "validator returned a non-appointment".to_string(),
            ));
        };

        let mut errors = ValidationErrors::new();

        if appointment.status != AppointmentStatus::Pending {
            errors.mismatch("status", "new appointments must start as pending");
        }
        if appointment.date < Utc::now() {
            errors.mismatch("date", "date must not be in the past");
        }
        if !self.store.property_exists(appointment.property_id).await? {
            errors.mismatch(
                "propertyId",
                format!(
                    "propertyId {} does not refer to an existing property",
                    appointment.property_id
                ),
            );
        }
        if self.store.get_user(appointment.user_id).await?.is_none() {
            errors.mismatch(
                "userId",
                format!("userId {} does not refer to an existing user", appointment.user_id),
            );
        }

        let appointment = errors.into_result(appointment)?;
        let created = self.store.create_appointment(&appointment).await?;

        info!(
            appointment_id = created.id,
            property_id = created.property_id,
            user_id,
            "Viewing booked"
        );
        Ok(created)
    }

    async fn list_booked(&self, user_id: i32) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_appointments_for_user(user_id).await?)
    }

    async fn list_received(&self, owner_id: i32) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_appointments_for_owner(owner_id).await?)
    }

    async fn update_status(
        &self,
        actor_id: i32,
        id: i32,
        raw: &Value,
    ) -> Result<Appointment, AppointmentError> {
        let mut r = FieldReader::new(raw)?;
        let next = r.required_tag::<AppointmentStatus>("status");
        let next = r.finish(|| next)?;

        let appointment = self
            .store
            .get_appointment(id)
            .await?
            .ok_or(AppointmentError::NotFound(id))?;

        let owner_id = self
            .store
            .get_property(appointment.property_id)
            .await?
            .map(|p| p.user_id);

        let party = if owner_id == Some(actor_id) {
            Party::Owner
        } else if appointment.user_id == actor_id {
            Party::Booker
        } else {
            Party::Stranger
        };

        if !may_request(party, next) {
            return Err(AppointmentError::Forbidden(match next {
                AppointmentStatus::Confirmed => {
                    "only the listing owner can confirm a viewing".to_string()
                }
                _ => "not a party to this appointment".to_string(),
            }));
        }

        let current = appointment.status();
        if !current.can_transition_to(next) {
            return Err(AppointmentError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let updated = self
            .store
            .update_appointment_status(id, next)
            .await?
            .ok_or(AppointmentError::NotFound(id))?;

        info!(appointment_id = id, from = %current, to = %next, "Appointment status changed");
        Ok(updated)
    }
}
