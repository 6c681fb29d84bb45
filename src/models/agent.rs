use serde::{Deserialize, Serialize};

use crate::entities::agents;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: i32,
    pub name: String,
    pub specialization: String,
    pub rating: String,
    pub properties_sold: i32,
    pub image_url: String,
    pub created_at: String,
}

impl From<agents::Model> for Agent {
    fn from(model: agents::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            specialization: model.specialization,
            rating: model.rating,
            properties_sold: model.properties_sold,
            image_url: model.image_url,
            created_at: model.created_at,
        }
    }
}
