//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{Store, is_unique_violation};
use crate::models::{Property, User};
use crate::services::user_service::{UserError, UserService};
use crate::validation::{CanonicalEntity, EntityKind, ValidationErrors, validate_insert};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn require_user(&self, user_id: i32) -> Result<User, UserError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, raw: &Value) -> Result<User, UserError> {
        let CanonicalEntity::User(user) = validate_insert(EntityKind::User, raw)? else {
            return Err(UserError::Internal("validator returned a non-user".to_string()));
        };

        let min = self.security.min_password_length;
        if user.password.chars().count() < min {
            let mut errors = ValidationErrors::new();
            errors.mismatch(
                "password",
                format!("password must be at least {min} characters"),
            );
            return Err(UserError::Invalid(errors));
        }

        if let Some(field) = self
            .store
            .find_user_conflict(&user.username, &user.email)
            .await?
        {
            return Err(UserError::Conflict {
                field: field.to_string(),
            });
        }

        let password_hash = self
            .store
            .hash_user_password(&user.password, &self.security)
            .await?;

        match self.store.create_user(&user, password_hash).await {
            Ok(created) => {
                info!(user_id = created.id, username = %created.username, "User registered");
                Ok(created)
            }
            // Lost a race with a concurrent registration.
            Err(e) if is_unique_violation(&e) => {
                warn!(username = %user.username, "Registration hit a unique constraint");
                Err(UserError::Conflict {
                    field: "username or email".to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, user_id: i32) -> Result<User, UserError> {
        self.require_user(user_id).await
    }

    async fn list_saved(&self, user_id: i32) -> Result<Vec<Property>, UserError> {
        let user = self.require_user(user_id).await?;
        Ok(self
            .store
            .get_properties_by_ids(&user.saved_properties)
            .await?)
    }

    async fn save_property(&self, user_id: i32, property_id: i32) -> Result<User, UserError> {
        let user = self.require_user(user_id).await?;

        if !self.store.property_exists(property_id).await? {
            return Err(UserError::PropertyNotFound(property_id));
        }

        if user.saved_properties.contains(&property_id) {
            return Ok(user);
        }

        let mut saved = user.saved_properties;
        saved.push(property_id);

        self.store
            .set_saved_properties(user_id, &saved)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    async fn unsave_property(&self, user_id: i32, property_id: i32) -> Result<User, UserError> {
        let user = self.require_user(user_id).await?;

        if !user.saved_properties.contains(&property_id) {
            return Ok(user);
        }

        let saved: Vec<i32> = user
            .saved_properties
            .into_iter()
            .filter(|id| *id != property_id)
            .collect();

        self.store
            .set_saved_properties(user_id, &saved)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }
}
