use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AgentService, AppointmentService, AuthService, PropertyService, SeaOrmAgentService,
    SeaOrmAppointmentService, SeaOrmAuthService, SeaOrmPropertyService, SeaOrmUserService,
    UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub property_service: Arc<dyn PropertyService>,

    pub appointment_service: Arc<dyn AppointmentService>,

    pub agent_service: Arc<dyn AgentService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires the services over an already-open store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let defaults = config.entity_defaults()?;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone())) as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService>;

        let property_service = Arc::new(SeaOrmPropertyService::new(
            store.clone(),
            defaults.clone(),
            config.listings.clone(),
        )) as Arc<dyn PropertyService>;

        let appointment_service = Arc::new(SeaOrmAppointmentService::new(
            store.clone(),
            defaults.clone(),
        )) as Arc<dyn AppointmentService>;

        let agent_service =
            Arc::new(SeaOrmAgentService::new(store.clone(), defaults)) as Arc<dyn AgentService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            user_service,
            property_service,
            appointment_service,
            agent_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
