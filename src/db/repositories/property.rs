use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func},
};

use crate::domain::{DecimalText, PropertyStatus, fold_rating};
use crate::entities::{prelude::*, properties, property_ratings};
use crate::models::Property;
use crate::validation::{NewProperty, PropertyQuery};

pub struct PropertyRepository {
    conn: DatabaseConnection,
}

impl PropertyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, property: &NewProperty) -> Result<Property> {
        let active = properties::ActiveModel {
            title: Set(property.title.clone()),
            description: Set(property.description.clone()),
            price: Set(property.price.as_str().to_string()),
            address: Set(property.address.clone()),
            city: Set(property.city.clone()),
            lat: Set(property.lat.as_str().to_string()),
            lng: Set(property.lng.as_str().to_string()),
            bedrooms: Set(property.bedrooms),
            bathrooms: Set(property.bathrooms),
            square_feet: Set(property.square_feet),
            year_built: Set(property.year_built),
            property_type: Set(property.property_type.clone()),
            listing_type: Set(property.listing_type.as_str().to_string()),
            image_url: Set(property.image_url.clone()),
            user_id: Set(property.user_id),
            featured: Set(property.featured),
            status: Set(property.status.as_str().to_string()),
            avg_rating: Set(property.avg_rating.as_str().to_string()),
            rating_count: Set(property.rating_count),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert property")?;

        Ok(Property::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Property>> {
        let model = Properties::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query property by ID")?;

        Ok(model.map(Property::from))
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Properties::find_by_id(id)
            .count(&self.conn)
            .await
            .context("Failed to check property existence")?;

        Ok(count > 0)
    }

    /// Runs a search. Equality and integer bounds are pushed into SQL; the
    /// price range is compared numerically on the fetched rows because the
    /// column holds decimal text.
    pub async fn search(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        let mut cond = Condition::all();

        if let Some(city) = &query.city {
            cond = cond.add(
                Expr::expr(Func::lower(Expr::col(properties::Column::City)))
                    .eq(city.to_lowercase()),
            );
        }
        if let Some(property_type) = &query.property_type {
            cond = cond.add(properties::Column::PropertyType.eq(property_type));
        }
        if let Some(listing_type) = query.listing_type {
            cond = cond.add(properties::Column::ListingType.eq(listing_type.as_str()));
        }
        if let Some(min) = query.min_beds {
            cond = cond.add(properties::Column::Bedrooms.gte(min));
        }
        if let Some(min) = query.min_baths {
            cond = cond.add(properties::Column::Bathrooms.gte(min));
        }
        if let Some(min) = query.min_sqft {
            cond = cond.add(properties::Column::SquareFeet.gte(min));
        }
        if let Some(max) = query.max_sqft {
            cond = cond.add(properties::Column::SquareFeet.lte(max));
        }
        if let Some(min) = query.min_year {
            cond = cond.add(properties::Column::YearBuilt.gte(min));
        }
        if let Some(max) = query.max_year {
            cond = cond.add(properties::Column::YearBuilt.lte(max));
        }

        let filters_price = query.min_price.is_some() || query.max_price.is_some();

        let mut select = Properties::find()
            .filter(cond)
            .order_by_desc(properties::Column::CreatedAt)
            .order_by_desc(properties::Column::Id);

        if !filters_price && let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let rows = select
            .all(&self.conn)
            .await
            .context("Failed to search properties")?;

        let mut results: Vec<Property> = rows
            .into_iter()
            .map(Property::from)
            .filter(|p| query.admits_price(&p.price()))
            .collect();

        if let Some(limit) = query.limit {
            results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(results)
    }

    pub async fn featured(&self, limit: u64) -> Result<Vec<Property>> {
        let rows = Properties::find()
            .filter(properties::Column::Featured.eq(true))
            .order_by_desc(properties::Column::CreatedAt)
            .order_by_desc(properties::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query featured properties")?;

        Ok(rows.into_iter().map(Property::from).collect())
    }

    pub async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Property>> {
        let rows = Properties::find()
            .filter(properties::Column::UserId.eq(user_id))
            .order_by_desc(properties::Column::CreatedAt)
            .order_by_desc(properties::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query properties by owner")?;

        Ok(rows.into_iter().map(Property::from).collect())
    }

    /// Fetches the given ids, in the order given. Missing ids are skipped.
    pub async fn get_many(&self, ids: &[i32]) -> Result<Vec<Property>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Properties::find()
            .filter(properties::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query properties by IDs")?;

        let mut found: Vec<Property> = rows.into_iter().map(Property::from).collect();
        found.sort_by_key(|p| ids.iter().position(|id| *id == p.id));
        Ok(found)
    }

    pub async fn update_status(&self, id: i32, status: PropertyStatus) -> Result<Option<Property>> {
        let Some(model) = Properties::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query property for status update")?
        else {
            return Ok(None);
        };

        let mut active: properties::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        let model = active.update(&self.conn).await?;

        Ok(Some(Property::from(model)))
    }

    pub async fn has_rated(&self, property_id: i32, user_id: i32) -> Result<bool> {
        let count = PropertyRatings::find()
            .filter(property_ratings::Column::PropertyId.eq(property_id))
            .filter(property_ratings::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to check existing rating")?;

        Ok(count > 0)
    }

    /// Stores `user_id`'s score and folds it into the running average, in
    /// one transaction. A second rating by the same user fails on the unique
    /// index and leaves the aggregate untouched.
    pub async fn record_rating(
        &self,
        id: i32,
        user_id: i32,
        score: u8,
    ) -> Result<Option<Property>> {
        let txn = self.conn.begin().await?;

        let Some(model) = Properties::find_by_id(id)
            .one(&txn)
            .await
            .context("Failed to query property for rating")?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        property_ratings::ActiveModel {
            property_id: Set(id),
            user_id: Set(user_id),
            score: Set(i32::from(score)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let current = DecimalText::parse(&model.avg_rating).unwrap_or_else(DecimalText::zero);
        let average = fold_rating(&current, model.rating_count, score);
        let count = model.rating_count.saturating_add(1);

        let mut active: properties::ActiveModel = model.into();
        active.avg_rating = Set(average.into_inner());
        active.rating_count = Set(count);
        let model = active.update(&txn).await?;

        txn.commit().await?;

        Ok(Some(Property::from(model)))
    }
}
