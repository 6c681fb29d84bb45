use serde::{Deserialize, Serialize};

use crate::entities::users;

/// A stored user, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: String,
    pub saved_properties: Vec<i32>,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            saved_properties: decode_saved(&model.saved_properties),
            username: model.username,
            email: model.email,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

/// Saved ids are stored as a JSON array. A corrupt column reads as empty.
#[must_use]
pub fn decode_saved(raw: &str) -> Vec<i32> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[must_use]
pub fn encode_saved(ids: &[i32]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}
