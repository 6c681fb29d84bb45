//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::models::User;
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .verify_user_credentials(username, password)
            .await?;

        match user {
            Some(user) => {
                info!(user_id = user.id, "User logged in");
                Ok(user)
            }
            None => {
                debug!("Rejected login attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn current_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}
