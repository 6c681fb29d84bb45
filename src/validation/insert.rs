//! Insert payload validation for each entity kind.
//!
//! The produced values carry every column except `id` and `created_at`,
//! which the store assigns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::{FieldReader, ValidationErrors};
use crate::domain::{AppointmentStatus, DecimalText, ListingType, PropertyStatus};

/// Values applied when a payload omits a defaulted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefaults {
    pub featured: bool,
    pub property_status: PropertyStatus,
    pub avg_rating: DecimalText,
    pub rating_count: i32,
    pub appointment_status: AppointmentStatus,
    pub agent_rating: DecimalText,
    pub properties_sold: i32,
}

impl Default for EntityDefaults {
    fn default() -> Self {
        Self {
            featured: false,
            property_status: PropertyStatus::Available,
            avg_rating: DecimalText::zero(),
            rating_count: 0,
            appointment_status: AppointmentStatus::Pending,
            agent_rating: DecimalText::zero(),
            properties_sold: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Property,
    Appointment,
    Agent,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Property => "property",
            Self::Appointment => "appointment",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(Self::User),
            "property" | "properties" => Ok(Self::Property),
            "appointment" | "appointments" => Ok(Self::Appointment),
            "agent" | "agents" => Ok(Self::Agent),
            other => Err(format!(
                "unknown entity kind '{other}' (expected user, property, appointment or agent)"
            )),
        }
    }
}

const MAX_AVERAGE_RATING: f64 = 5.0;

#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    /// Plaintext as submitted. Hashed by the auth service before storage.
    /// Serialized so the canonical form re-validates; `Debug` redacts it.
    pub password: String,
    pub email: String,
    pub name: String,
    pub saved_properties: Vec<i32>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("saved_properties", &self.saved_properties)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: DecimalText,
    pub address: String,
    pub city: String,
    pub lat: DecimalText,
    pub lng: DecimalText,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub square_feet: i32,
    pub year_built: Option<i32>,
    pub property_type: String,
    pub listing_type: ListingType,
    pub image_url: String,
    pub user_id: i32,
    pub featured: bool,
    pub status: PropertyStatus,
    pub avg_rating: DecimalText,
    pub rating_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub property_id: i32,
    pub user_id: i32,
    pub date: DateTime<Utc>,
    pub message: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgent {
    pub name: String,
    pub specialization: String,
    pub rating: DecimalText,
    pub properties_sold: i32,
    pub image_url: String,
}

/// A validated insert value of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CanonicalEntity {
    User(NewUser),
    Property(NewProperty),
    Appointment(NewAppointment),
    Agent(NewAgent),
}

impl CanonicalEntity {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Property(_) => EntityKind::Property,
            Self::Appointment(_) => EntityKind::Appointment,
            Self::Agent(_) => EntityKind::Agent,
        }
    }
}

/// Validates `raw` as an insert payload of `kind` using the stock defaults.
///
/// # Examples
///
/// ```rust
/// use homestead::validation::{CanonicalEntity, EntityKind, validate_insert};
/// use serde_json::json;
///
/// let raw = json!({
///     "username": "jdoe",
///     "password": "hunter22",
///     "email": "jdoe@example.com",
///     "name": "Jane Doe"
/// });
/// let Ok(CanonicalEntity::User(user)) = validate_insert(EntityKind::User, &raw) else {
///     panic!("expected a user");
/// };
/// assert!(user.saved_properties.is_empty());
/// ```
pub fn validate_insert(kind: EntityKind, raw: &Value) -> Result<CanonicalEntity, ValidationErrors> {
    validate_insert_with(kind, raw, &EntityDefaults::default())
}

pub fn validate_insert_with(
    kind: EntityKind,
    raw: &Value,
    defaults: &EntityDefaults,
) -> Result<CanonicalEntity, ValidationErrors> {
    match kind {
        EntityKind::User => NewUser::from_payload(raw).map(CanonicalEntity::User),
        EntityKind::Property => {
            NewProperty::from_payload(raw, defaults).map(CanonicalEntity::Property)
        }
        EntityKind::Appointment => {
            NewAppointment::from_payload(raw, defaults).map(CanonicalEntity::Appointment)
        }
        EntityKind::Agent => NewAgent::from_payload(raw, defaults).map(CanonicalEntity::Agent),
    }
}

impl NewUser {
    pub fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = FieldReader::new(raw)?;

        let username = r.required_text("username");
        let password = r.required_text("password");
        let email = r.required_text("email");
        let name = r.required_text("name");
        let saved_properties = r.optional_id_list("savedProperties").unwrap_or_default();

        r.finish(|| {
            Some(Self {
                username: username?,
                password: password?,
                email: email?,
                name: name?,
                saved_properties,
            })
        })
    }
}

impl NewProperty {
    pub fn from_payload(raw: &Value, defaults: &EntityDefaults) -> Result<Self, ValidationErrors> {
        let mut r = FieldReader::new(raw)?;

        let title = r.required_text("title");
        let description = r.required_text("description");
        let price = r.required_decimal("price");
        let address = r.required_text("address");
        let city = r.required_text("city");
        let lat = r.required_decimal("lat");
        let lng = r.required_decimal("lng");
        let bedrooms = r.required_count("bedrooms");
        let bathrooms = r.required_count("bathrooms");
        let square_feet = r.required_count("squareFeet");
        let year_built = r.optional_year("yearBuilt");
        let property_type = r.required_text("propertyType");
        let listing_type = r.required_tag::<ListingType>("listingType");
        let image_url = r.required_text("imageUrl");
        let user_id = r.required_id("userId");
        let featured = r.optional_flag("featured").unwrap_or(defaults.featured);
        let status = r
            .optional_tag::<PropertyStatus>("status")
            .unwrap_or(defaults.property_status);
        let avg_rating = r.optional_decimal("avgRating");
        let rating_count = r.optional_count("ratingCount");
        if let Some(avg) = &avg_rating {
            let value = avg.to_f64();
            if value < 0.0 {
                r.reject("avgRating", "avgRating must not be negative");
            } else if value > MAX_AVERAGE_RATING {
                r.reject("avgRating", "avgRating must be at most 5");
            } else if !avg.is_zero() && rating_count.unwrap_or(defaults.rating_count) == 0 {
                r.reject("avgRating", "avgRating must be 0 when ratingCount is 0");
            }
        }
        let avg_rating = avg_rating.unwrap_or_else(|| defaults.avg_rating.clone());
        let rating_count = rating_count.unwrap_or(defaults.rating_count);

        r.finish(|| {
            Some(Self {
                title: title?,
                description: description?,
                price: price?,
                address: address?,
                city: city?,
                lat: lat?,
                lng: lng?,
                bedrooms: bedrooms?,
                bathrooms: bathrooms?,
                square_feet: square_feet?,
                year_built,
                property_type: property_type?,
                listing_type: listing_type?,
                image_url: image_url?,
                user_id: user_id?,
                featured,
                status,
                avg_rating,
                rating_count,
            })
        })
    }

    /// Average rating, only when at least one rating exists.
    #[must_use]
    pub fn average_rating(&self) -> Option<&DecimalText> {
        (self.rating_count > 0).then_some(&self.avg_rating)
    }
}

impl NewAppointment {
    pub fn from_payload(raw: &Value, defaults: &EntityDefaults) -> Result<Self, ValidationErrors> {
        let mut r = FieldReader::new(raw)?;

        let property_id = r.required_id("propertyId");
        let user_id = r.required_id("userId");
        let date = r.required_datetime("date");
        let message = r.optional_text("message");
        let status = r
            .optional_tag::<AppointmentStatus>("status")
            .unwrap_or(defaults.appointment_status);

        r.finish(|| {
            Some(Self {
                property_id: property_id?,
                user_id: user_id?,
                date: date?,
                message,
                status,
            })
        })
    }
}

impl NewAgent {
    pub fn from_payload(raw: &Value, defaults: &EntityDefaults) -> Result<Self, ValidationErrors> {
        let mut r = FieldReader::new(raw)?;

        let name = r.required_text("name");
        let specialization = r.required_text("specialization");
        let rating = r
            .optional_decimal("rating")
            .unwrap_or_else(|| defaults.agent_rating.clone());
        let properties_sold = r
            .optional_count("propertiesSold")
            .unwrap_or(defaults.properties_sold);
        let image_url = r.required_text("imageUrl");

        r.finish(|| {
            Some(Self {
                name: name?,
                specialization: specialization?,
                rating,
                properties_sold,
                image_url: image_url?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorKind;
    use serde_json::json;

    fn property_payload() -> Value {
        json!({
            "title": "Sunny loft",
            "description": "Top floor, lots of light",
            "price": 250_000,
            "address": "12 Market St",
            "city": "Springfield",
            "lat": "37.7749",
            "lng": -122.4194,
            "bedrooms": "3",
            "bathrooms": 2,
            "squareFeet": "1400",
            "propertyType": "apartment",
            "listingType": "buy",
            "imageUrl": "https://img.example.com/1.jpg",
            "userId": 1
        })
    }

    fn property(raw: &Value) -> Result<NewProperty, ValidationErrors> {
        NewProperty::from_payload(raw, &EntityDefaults::default())
    }

    #[test]
    fn test_property_coercions() {
        let p = property(&property_payload()).unwrap();
        assert_eq!(p.price.as_str(), "250000");
        assert_eq!(p.lat.as_str(), "37.7749");
        assert_eq!(p.lng.as_str(), "-122.4194");
        assert_eq!(p.bedrooms, 3);
        assert_eq!(p.bathrooms, 2);
        assert_eq!(p.square_feet, 1400);
        assert_eq!(p.year_built, None);
        assert_eq!(p.listing_type, ListingType::Buy);
    }

    #[test]
    fn test_property_price_string_kept_verbatim() {
        let mut raw = property_payload();
        raw["price"] = json!("250000.50");
        assert_eq!(property(&raw).unwrap().price.as_str(), "250000.50");
    }

    #[test]
    fn test_property_defaults_applied() {
        let p = property(&property_payload()).unwrap();
        assert!(!p.featured);
        assert_eq!(p.status, PropertyStatus::Available);
        assert_eq!(p.avg_rating.as_str(), "0");
        assert_eq!(p.rating_count, 0);
        assert_eq!(p.average_rating(), None);
    }

    #[test]
    fn test_property_custom_defaults() {
        let defaults = EntityDefaults {
            property_status: PropertyStatus::Pending,
            ..EntityDefaults::default()
        };
        let p = NewProperty::from_payload(&property_payload(), &defaults).unwrap();
        assert_eq!(p.status, PropertyStatus::Pending);
    }

    #[test]
    fn test_property_year_built_variants() {
        let mut raw = property_payload();
        raw["yearBuilt"] = json!("");
        assert_eq!(property(&raw).unwrap().year_built, None);

        raw["yearBuilt"] = json!(null);
        assert_eq!(property(&raw).unwrap().year_built, None);

        raw["yearBuilt"] = json!("1998");
        assert_eq!(property(&raw).unwrap().year_built, Some(1998));

        raw["yearBuilt"] = json!(2004);
        assert_eq!(property(&raw).unwrap().year_built, Some(2004));

        raw["yearBuilt"] = json!("old");
        let errors = property(&raw).unwrap_err();
        assert_eq!(errors.get("yearBuilt").unwrap().kind, ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_property_missing_title() {
        let mut raw = property_payload();
        raw.as_object_mut().unwrap().remove("title");
        let errors = property(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        let err = errors.get("title").unwrap();
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.message, "title is required");
    }

    #[test]
    fn test_property_errors_are_aggregated() {
        let mut raw = property_payload();
        let map = raw.as_object_mut().unwrap();
        map.remove("title");
        map.insert("bedrooms".into(), json!("three"));
        map.insert("listingType".into(), json!("lease"));
        map.insert("price".into(), json!("a lot"));

        let errors = property(&raw).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("title").unwrap().kind, ErrorKind::MissingField);
        assert_eq!(errors.get("bedrooms").unwrap().kind, ErrorKind::ShapeMismatch);
        assert_eq!(errors.get("listingType").unwrap().kind, ErrorKind::ShapeMismatch);
        assert_eq!(errors.get("price").unwrap().kind, ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_property_ignores_server_fields() {
        let mut raw = property_payload();
        raw["id"] = json!(99);
        raw["createdAt"] = json!("2020-01-01T00:00:00Z");
        assert!(property(&raw).is_ok());
    }

    #[test]
    fn test_property_idempotent_on_canonical_input() {
        let first = property(&property_payload()).unwrap();
        let canonical = serde_json::to_value(&first).unwrap();
        let second = property(&canonical).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_user_defaults_saved_properties() {
        let raw = json!({
            "username": "jdoe",
            "password": "hunter22",
            "email": "jdoe@example.com",
            "name": "Jane Doe"
        });
        let user = NewUser::from_payload(&raw).unwrap();
        assert!(user.saved_properties.is_empty());
    }

    #[test]
    fn test_user_saved_properties_from_string() {
        let raw = json!({
            "username": "jdoe",
            "password": "hunter22",
            "email": "jdoe@example.com",
            "name": "Jane Doe",
            "savedProperties": "4,2,4"
        });
        let user = NewUser::from_payload(&raw).unwrap();
        assert_eq!(user.saved_properties, vec![4, 2]);
    }

    fn user_payload() -> Value {
        json!({
            "username": "jdoe",
            "password": "hunter22",
            "email": "jdoe@example.com",
            "name": "Jane Doe",
            "savedProperties": [3, 1]
        })
    }

    #[test]
    fn test_user_password_never_printed() {
        let user = NewUser::from_payload(&user_payload()).unwrap();
        assert!(!format!("{user:?}").contains("hunter22"));
    }

    #[test]
    fn test_user_idempotent_on_canonical_input() {
        let first = NewUser::from_payload(&user_payload()).unwrap();
        let canonical = serde_json::to_value(&first).unwrap();
        assert_eq!(canonical["password"], "hunter22");
        let second = NewUser::from_payload(&canonical).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_property_rating_aggregate_must_be_consistent() {
        let mut raw = property_payload();
        raw["avgRating"] = json!("-7");
        raw["ratingCount"] = json!(1000);
        let errors = property(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("avgRating").unwrap().message,
            "avgRating must not be negative"
        );

        raw["avgRating"] = json!("4.5");
        raw["ratingCount"] = json!(0);
        let errors = property(&raw).unwrap_err();
        assert_eq!(
            errors.get("avgRating").unwrap().message,
            "avgRating must be 0 when ratingCount is 0"
        );

        raw.as_object_mut().unwrap().remove("ratingCount");
        assert!(property(&raw).is_err());

        raw["avgRating"] = json!(9);
        raw["ratingCount"] = json!(3);
        assert!(property(&raw).is_err());

        raw["avgRating"] = json!("4.5");
        let p = property(&raw).unwrap();
        assert_eq!(p.average_rating().map(DecimalText::as_str), Some("4.5"));

        raw["avgRating"] = json!("0.00");
        raw["ratingCount"] = json!(0);
        assert!(property(&raw).is_ok());
    }

    #[test]
    fn test_appointment_date_parsing() {
        let raw = json!({
            "propertyId": 3,
            "userId": 1,
            "date": "2024-05-01T10:00:00Z",
            "message": "Evenings work best"
        });
        let appt = NewAppointment::from_payload(&raw, &EntityDefaults::default()).unwrap();
        assert_eq!(appt.date.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.message.as_deref(), Some("Evenings work best"));
    }

    #[test]
    fn test_appointment_bad_date() {
        let raw = json!({ "propertyId": 3, "userId": 1, "date": "not-a-date" });
        let errors = NewAppointment::from_payload(&raw, &EntityDefaults::default()).unwrap_err();
        assert_eq!(errors.get("date").unwrap().kind, ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_appointment_idempotent_on_canonical_input() {
        let raw = json!({
            "propertyId": "3",
            "userId": 1,
            "date": "2024-05-01T10:00:00Z",
            "status": "confirmed"
        });
        let defaults = EntityDefaults::default();
        let first = NewAppointment::from_payload(&raw, &defaults).unwrap();
        let canonical = serde_json::to_value(&first).unwrap();
        let second = NewAppointment::from_payload(&canonical, &defaults).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_agent_idempotent_on_canonical_input() {
        let raw = json!({
            "name": "Maria Lopez",
            "specialization": "Luxury homes",
            "rating": 4.8,
            "propertiesSold": "120",
            "imageUrl": "https://img.example.com/maria.jpg"
        });
        let defaults = EntityDefaults::default();
        let first = NewAgent::from_payload(&raw, &defaults).unwrap();
        let canonical = serde_json::to_value(&first).unwrap();
        let second = NewAgent::from_payload(&canonical, &defaults).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_agent_defaults() {
        let raw = json!({
            "name": "Maria Lopez",
            "specialization": "Luxury homes",
            "imageUrl": "https://img.example.com/maria.jpg"
        });
        let agent = NewAgent::from_payload(&raw, &EntityDefaults::default()).unwrap();
        assert_eq!(agent.rating.as_str(), "0");
        assert_eq!(agent.properties_sold, 0);
    }

    #[test]
    fn test_validate_insert_dispatches_by_kind() {
        let entity = validate_insert(EntityKind::Property, &property_payload()).unwrap();
        assert_eq!(entity.kind(), EntityKind::Property);

        let err = validate_insert(EntityKind::User, &property_payload()).unwrap_err();
        assert!(err.get("username").is_some());
    }

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!("Property".parse::<EntityKind>().unwrap(), EntityKind::Property);
        assert_eq!("agents".parse::<EntityKind>().unwrap(), EntityKind::Agent);
        assert!("house".parse::<EntityKind>().is_err());
    }
}
