//! `SeaORM` implementation of the `PropertyService` trait.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::ListingsConfig;
use crate::db::{Store, is_unique_violation};
use crate::domain::PropertyStatus;
use crate::models::Property;
use crate::services::property_service::{PropertyError, PropertyService};
use crate::validation::{
    CanonicalEntity, EntityDefaults, EntityKind, FieldReader, PropertyFilter, PropertyQuery,
    ValidationErrors, validate_insert_with,
};

const MIN_SCORE: i32 = 1;
const MAX_SCORE: i32 = 5;

pub struct SeaOrmPropertyService {
    store: Store,
    defaults: EntityDefaults,
    listings: ListingsConfig,
}

impl SeaOrmPropertyService {
    #[must_use]
    pub const fn new(store: Store, defaults: EntityDefaults, listings: ListingsConfig) -> Self {
        Self {
            store,
            defaults,
            listings,
        }
    }

    fn page_size(&self, requested: Option<u64>) -> u64 {
        requested.map_or(self.listings.max_page_size, |n| {
            n.min(self.listings.max_page_size)
        })
    }
}

#[async_trait]
impl PropertyService for SeaOrmPropertyService {
    async fn search(
        &self,
        filter: &PropertyFilter,
        limit: Option<u64>,
    ) -> Result<Vec<Property>, PropertyError> {
        let query = PropertyQuery::try_from(filter)?.with_limit(self.page_size(limit));
        Ok(self.store.search_properties(&query).await?)
    }

    async fn featured(&self) -> Result<Vec<Property>, PropertyError> {
        Ok(self
            .store
            .featured_properties(self.listings.featured_limit)
            .await?)
    }

    async fn get(&self, id: i32) -> Result<Property, PropertyError> {
        self.store
            .get_property(id)
            .await?
            .ok_or(PropertyError::NotFound(id))
    }

    async fn create(&self, owner_id: i32, raw: &Value) -> Result<Property, PropertyError> {
        let mut payload = raw.clone();
        if let Some(map) = payload.as_object_mut() {
            map.insert("userId".to_string(), Value::from(owner_id));
        }

        let CanonicalEntity::Property(mut property) =
            validate_insert_with(EntityKind::Property, &payload, &self.defaults)?
        else {
            return Err(PropertyError::Internal(
                "validator returned a non-property".to_string(),
            ));
        };

        property.featured = self.defaults.featured;
        property.avg_rating = self.defaults.avg_rating.clone();
        property.rating_count = self.defaults.rating_count;

        if self.store.get_user(property.user_id).await?.is_none() {
            let mut errors = ValidationErrors::new();
            errors.mismatch(
                "userId",
                format!("userId {} does not refer to an existing user", property.user_id),
            );
            return Err(PropertyError::Invalid(errors));
        }

        let created = self.store.create_property(&property).await?;
        info!(property_id = created.id, owner_id, city = %created.city, "Listing created");
        Ok(created)
    }

    async fn update_status(
        &self,
        actor_id: i32,
        id: i32,
        raw: &Value,
    ) -> Result<Property, PropertyError> {
        let mut r = FieldReader::new(raw)?;
        let status = r.required_tag::<PropertyStatus>("status");
        let status = r.finish(|| status)?;

        let property = self.get(id).await?;
        if property.user_id != actor_id {
            return Err(PropertyError::Forbidden(
                "only the owner can change a listing's status".to_string(),
            ));
        }

        let updated = self
            .store
            .update_property_status(id, status)
            .await?
            .ok_or(PropertyError::NotFound(id))?;

        info!(property_id = id, status = %status, "Listing status changed");
        Ok(updated)
    }

    async fn rate(&self, rater_id: i32, id: i32, raw: &Value) -> Result<Property, PropertyError> {
        let mut r = FieldReader::new(raw)?;
        let score = r.required_count("score");
        if let Some(s) = score
            && !(MIN_SCORE..=MAX_SCORE).contains(&s)
        {
            r.reject(
                "score",
                format!("score must be between {MIN_SCORE} and {MAX_SCORE}"),
            );
        }
        let score = r.finish(|| score.and_then(|s| u8::try_from(s).ok()))?;

        let property = self.get(id).await?;
        if property.user_id == rater_id {
            return Err(PropertyError::Forbidden(
                "owners cannot rate their own listing".to_string(),
            ));
        }
        if self.store.has_rated_property(id, rater_id).await? {
            return Err(PropertyError::Conflict(
                "you have already rated this listing".to_string(),
            ));
        }

        let rated = match self.store.record_property_rating(id, rater_id, score).await {
            Ok(rated) => rated.ok_or(PropertyError::NotFound(id))?,
            Err(e) if is_unique_violation(&e) => {
                return Err(PropertyError::Conflict(
                    "you have already rated this listing".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        info!(property_id = id, rater_id, score, "Listing rated");
        Ok(rated)
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Property>, PropertyError> {
        Ok(self.store.list_properties_by_owner(owner_id).await?)
    }
}
