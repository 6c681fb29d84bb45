use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::DecimalText;
use crate::entities::{agents, prelude::*};
use crate::models::Agent;
use crate::validation::NewAgent;

pub struct AgentRepository {
    conn: DatabaseConnection,
}

impl AgentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All agents, highest rated first. Ties keep insertion order.
    pub async fn list(&self) -> Result<Vec<Agent>> {
        let rows = Agents::find()
            .all(&self.conn)
            .await
            .context("Failed to list agents")?;

        let mut agents: Vec<Agent> = rows.into_iter().map(Agent::from).collect();
        // Ratings are decimal text, so order numerically rather than in SQL.
        agents.sort_by(|a, b| rating_of(b).total_cmp(&rating_of(a)));
        Ok(agents)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Agent>> {
        let model = Agents::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query agent by ID")?;

        Ok(model.map(Agent::from))
    }

    pub async fn create(&self, agent: &NewAgent) -> Result<Agent> {
        let active = agents::ActiveModel {
            name: Set(agent.name.clone()),
            specialization: Set(agent.specialization.clone()),
            rating: Set(agent.rating.as_str().to_string()),
            properties_sold: Set(agent.properties_sold),
            image_url: Set(agent.image_url.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert agent")?;

        Ok(Agent::from(model))
    }
}

fn rating_of(agent: &Agent) -> f64 {
    DecimalText::parse(&agent.rating).map_or(0.0, |d| d.to_f64())
}
