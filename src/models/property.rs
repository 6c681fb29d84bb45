use serde::{Deserialize, Serialize};

use crate::domain::DecimalText;
use crate::entities::properties;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: String,
    pub address: String,
    pub city: String,
    pub lat: String,
    pub lng: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub square_feet: i32,
    pub year_built: Option<i32>,
    pub property_type: String,
    pub listing_type: String,
    pub image_url: String,
    pub user_id: i32,
    pub featured: bool,
    pub status: String,
    pub avg_rating: String,
    pub rating_count: i32,
    pub created_at: String,
}

impl Property {
    /// Stored price as a decimal. Unreadable text counts as zero.
    #[must_use]
    pub fn price(&self) -> DecimalText {
        DecimalText::parse(&self.price).unwrap_or_else(DecimalText::zero)
    }

    /// `None` until the listing has been rated at least once.
    #[must_use]
    pub fn average_rating(&self) -> Option<DecimalText> {
        if self.rating_count == 0 {
            return None;
        }
        DecimalText::parse(&self.avg_rating)
    }
}

impl From<properties::Model> for Property {
    fn from(model: properties::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            address: model.address,
            city: model.city,
            lat: model.lat,
            lng: model.lng,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            square_feet: model.square_feet,
            year_built: model.year_built,
            property_type: model.property_type,
            listing_type: model.listing_type,
            image_url: model.image_url,
            user_id: model.user_id,
            featured: model.featured,
            status: model.status,
            avg_rating: model.avg_rating,
            rating_count: model.rating_count,
            created_at: model.created_at,
        }
    }
}
