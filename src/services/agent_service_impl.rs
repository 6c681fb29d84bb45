//! `SeaORM` implementation of the `AgentService` trait.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::db::Store;
use crate::models::Agent;
use crate::services::agent_service::{AgentError, AgentService};
use crate::validation::{CanonicalEntity, EntityDefaults, EntityKind, validate_insert_with};

pub struct SeaOrmAgentService {
    store: Store,
    defaults: EntityDefaults,
}

impl SeaOrmAgentService {
    #[must_use]
    pub const fn new(store: Store, defaults: EntityDefaults) -> Self {
        Self { store, defaults }
    }
}

#[async_trait]
impl AgentService for SeaOrmAgentService {
    async fn list(&self) -> Result<Vec<Agent>, AgentError> {
        Ok(self.store.list_agents().await?)
    }

    async fn get(&self, id: i32) -> Result<Agent, AgentError> {
        self.store
            .get_agent(id)
            .await?
            .ok_or(AgentError::NotFound(id))
    }

    async fn create(&self, raw: &Value) -> Result<Agent, AgentError> {
        let CanonicalEntity::Agent(agent) =
            validate_insert_with(EntityKind::Agent, raw, &self.defaults)?
        else {
            return Err(AgentError::Internal("validator returned a non-agent".to_string()));
        };

        let created = self.store.create_agent(&agent).await?;
        info!(agent_id = created.id, name = %created.name, "Agent profile created");
        Ok(created)
    }
}
