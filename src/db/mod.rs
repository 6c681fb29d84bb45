use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{AppointmentStatus, PropertyStatus};
use crate::models::{Agent, Appointment, Property, User};
use crate::validation::{NewAgent, NewAppointment, NewProperty, NewUser, PropertyQuery};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{hash_password, verify_password};

/// True if `err` wraps a database unique-constraint violation.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every pooled connection to `:memory:` would get its own empty database.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            in_memory,
            "Database connected & migrations applied (pool: {}-{})",
            min_connections,
            max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn property_repo(&self) -> repositories::property::PropertyRepository {
        repositories::property::PropertyRepository::new(self.conn.clone())
    }

    fn appointment_repo(&self) -> repositories::appointment::AppointmentRepository {
        repositories::appointment::AppointmentRepository::new(self.conn.clone())
    }

    fn agent_repo(&self) -> repositories::agent::AgentRepository {
        repositories::agent::AgentRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(&self, user: &NewUser, password_hash: String) -> Result<User> {
        self.user_repo().create(user, password_hash).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn find_user_conflict(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<&'static str>> {
        self.user_repo().find_conflict(username, email).await
    }

    pub async fn verify_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo()
            .verify_credentials(username, password)
            .await
    }

    pub async fn set_saved_properties(&self, user_id: i32, ids: &[i32]) -> Result<Option<User>> {
        self.user_repo().set_saved_properties(user_id, ids).await
    }

    /// Hashes on a blocking thread with the configured Argon2 params.
    pub async fn hash_user_password(&self, password: &str, config: &SecurityConfig) -> Result<String> {
        let password = password.to_string();
        let config = config.clone();
        tokio::task::spawn_blocking(move || hash_password(&password, Some(&config))).await?
    }

    // ========== Properties ==========

    pub async fn create_property(&self, property: &NewProperty) -> Result<Property> {
        self.property_repo().create(property).await
    }

    pub async fn get_property(&self, id: i32) -> Result<Option<Property>> {
        self.property_repo().get(id).await
    }

    pub async fn property_exists(&self, id: i32) -> Result<bool> {
        self.property_repo().exists(id).await
    }

    pub async fn search_properties(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        self.property_repo().search(query).await
    }

    pub async fn featured_properties(&self, limit: u64) -> Result<Vec<Property>> {
        self.property_repo().featured(limit).await
    }

    pub async fn list_properties_by_owner(&self, user_id: i32) -> Result<Vec<Property>> {
        self.property_repo().list_by_owner(user_id).await
    }

    pub async fn get_properties_by_ids(&self, ids: &[i32]) -> Result<Vec<Property>> {
        self.property_repo().get_many(ids).await
    }

    pub async fn update_property_status(
        &self,
        id: i32,
        status: PropertyStatus,
    ) -> Result<Option<Property>> {
        self.property_repo().update_status(id, status).await
    }

    pub async fn has_rated_property(&self, property_id: i32, user_id: i32) -> Result<bool> {
        self.property_repo().has_rated(property_id, user_id).await
    }

    pub async fn record_property_rating(
        &self,
        id: i32,
        user_id: i32,
        score: u8,
    ) -> Result<Option<Property>> {
        self.property_repo().record_rating(id, user_id, score).await
    }

    // ========== Appointments ==========

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.appointment_repo().create(appointment).await
    }

    pub async fn get_appointment(&self, id: i32) -> Result<Option<Appointment>> {
        self.appointment_repo().get(id).await
    }

    pub async fn list_appointments_for_user(&self, user_id: i32) -> Result<Vec<Appointment>> {
        self.appointment_repo().list_for_user(user_id).await
    }

    pub async fn list_appointments_for_owner(&self, owner_id: i32) -> Result<Vec<Appointment>> {
        self.appointment_repo().list_for_owner(owner_id).await
    }

    pub async fn update_appointment_status(
        &self,
        id: i32,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        self.appointment_repo().update_status(id, status).await
    }

    // ========== Agents ==========

    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        self.agent_repo().list().await
    }

    pub async fn get_agent(&self, id: i32) -> Result<Option<Agent>> {
        self.agent_repo().get(id).await
    }

    pub async fn create_agent(&self, agent: &NewAgent) -> Result<Agent> {
        self.agent_repo().create(agent).await
    }
}
