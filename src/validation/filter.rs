//! Property search filters.
//!
//! [`validate_filter`] checks only the shape of the query: every field is an
//! optional string. [`PropertyQuery`] is the parsed form the store runs;
//! it treats an absent or empty bound as "no constraint", never as zero.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{FieldReader, ValidationErrors, coerce};
use crate::domain::{DecimalText, ListingType};

const FILTER_KEYS: &[&str] = &[
    "city",
    "minPrice",
    "maxPrice",
    "minBeds",
    "minBaths",
    "propertyType",
    "listingType",
    "minSqft",
    "maxSqft",
    "minYear",
    "maxYear",
];

/// Raw search parameters, as accepted from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_beds: Option<String>,
    pub min_baths: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub min_sqft: Option<String>,
    pub max_sqft: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
}

/// Validates the shape of a search request.
///
/// Unrecognised keys are ignored. A known key holding anything other than a
/// string (or `null`) is a shape mismatch.
pub fn validate_filter(raw: &Value) -> Result<PropertyFilter, ValidationErrors> {
    let mut r = FieldReader::new(raw)?;

    let ignored = r.unknown_keys(FILTER_KEYS);
    if !ignored.is_empty() {
        debug!(keys = ?ignored, "Ignoring unrecognised filter keys");
    }

    let mut text = |name: &str| -> Option<String> {
        match raw.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                r.reject(name, format!("{name} must be a string"));
                None
            }
        }
    };

    let filter = PropertyFilter {
        city: text("city"),
        min_price: text("minPrice"),
        max_price: text("maxPrice"),
        min_beds: text("minBeds"),
        min_baths: text("minBaths"),
        property_type: text("propertyType"),
        listing_type: text("listingType"),
        min_sqft: text("minSqft"),
        max_sqft: text("maxSqft"),
        min_year: text("minYear"),
        max_year: text("maxYear"),
    };

    r.finish(|| Some(filter))
}

/// Parsed search constraints. `None` means the dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_beds: Option<i32>,
    pub min_baths: Option<i32>,
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub min_sqft: Option<i32>,
    pub max_sqft: Option<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub limit: Option<u64>,
}

impl PropertyQuery {
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Price bounds are compared numerically on the decimal text.
    #[must_use]
    pub fn admits_price(&self, price: &DecimalText) -> bool {
        let value = price.to_f64();
        self.min_price.is_none_or(|min| value >= min) && self.max_price.is_none_or(|max| value <= max)
    }
}

impl TryFrom<&PropertyFilter> for PropertyQuery {
    type Error = ValidationErrors;

    fn try_from(filter: &PropertyFilter) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let query = Self {
            city: non_empty(filter.city.as_deref()).map(str::to_string),
            min_price: price_bound(&mut errors, "minPrice", filter.min_price.as_deref()),
            max_price: price_bound(&mut errors, "maxPrice", filter.max_price.as_deref()),
            min_beds: int_bound(&mut errors, "minBeds", filter.min_beds.as_deref()),
            min_baths: int_bound(&mut errors, "minBaths", filter.min_baths.as_deref()),
            property_type: non_empty(filter.property_type.as_deref()).map(str::to_string),
            listing_type: listing_bound(&mut errors, filter.listing_type.as_deref()),
            min_sqft: int_bound(&mut errors, "minSqft", filter.min_sqft.as_deref()),
            max_sqft: int_bound(&mut errors, "maxSqft", filter.max_sqft.as_deref()),
            min_year: int_bound(&mut errors, "minYear", filter.min_year.as_deref()),
            max_year: int_bound(&mut errors, "maxYear", filter.max_year.as_deref()),
            limit: None,
        };

        errors.into_result(query)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn price_bound(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<f64> {
    let raw = non_empty(raw)?;
    match DecimalText::parse(raw) {
        Some(d) => Some(d.to_f64()),
        None => {
            errors.mismatch(field, format!("{field} must be a decimal number, got '{raw}'"));
            None
        }
    }
}

fn int_bound(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<i32> {
    let raw = non_empty(raw)?;
    match coerce::integer(&Value::String(raw.to_string())) {
        Ok(n) => Some(n),
        Err(message) => {
            errors.mismatch(field, format!("{field} {message}"));
            None
        }
    }
}

fn listing_bound(errors: &mut ValidationErrors, raw: Option<&str>) -> Option<ListingType> {
    let raw = non_empty(raw)?;
    match raw.parse::<ListingType>() {
        Ok(t) => Some(t),
        Err(e) => {
            errors.mismatch(
                "listingType",
                format!("listingType must be one of: {} (got '{}')", e.expected, e.value),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_is_valid() {
        let filter = validate_filter(&json!({})).unwrap();
        assert_eq!(filter, PropertyFilter::default());

        let query = PropertyQuery::try_from(&filter).unwrap();
        assert_eq!(query, PropertyQuery::default());
    }

    #[test]
    fn test_city_only_filter() {
        let filter = validate_filter(&json!({ "city": "Austin" })).unwrap();
        assert_eq!(filter.city.as_deref(), Some("Austin"));
        assert!(filter.min_price.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let filter = validate_filter(&json!({ "city": "Austin", "sort": "price" })).unwrap();
        assert_eq!(filter.city.as_deref(), Some("Austin"));
    }

    #[test]
    fn test_non_string_value_rejected() {
        let errors = validate_filter(&json!({ "minPrice": 100_000, "minBeds": true })).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_mismatch("minPrice"));
        assert!(errors.has_mismatch("minBeds"));
    }

    #[test]
    fn test_query_parses_bounds() {
        let filter = validate_filter(&json!({
            "minPrice": "100000",
            "maxPrice": "350000.50",
            "minBeds": "2",
            "listingType": "rent",
            "minYear": "1990"
        }))
        .unwrap();
        let query = PropertyQuery::try_from(&filter).unwrap();
        assert_eq!(query.min_price, Some(100_000.0));
        assert_eq!(query.max_price, Some(350_000.5));
        assert_eq!(query.min_beds, Some(2));
        assert_eq!(query.listing_type, Some(ListingType::Rent));
        assert_eq!(query.min_year, Some(1990));
        assert_eq!(query.max_year, None);
    }

    #[test]
    fn test_empty_bounds_are_unconstrained() {
        let filter = validate_filter(&json!({ "minPrice": "", "minBeds": "  ", "city": "" })).unwrap();
        let query = PropertyQuery::try_from(&filter).unwrap();
        assert_eq!(query.min_price, None);
        assert_eq!(query.min_beds, None);
        assert_eq!(query.city, None);
    }

    #[test]
    fn test_unparseable_bounds_fail() {
        let filter = validate_filter(&json!({ "minPrice": "cheap", "maxSqft": "big" })).unwrap();
        let errors = PropertyQuery::try_from(&filter).unwrap_err();
        assert!(errors.has_mismatch("minPrice"));
        assert!(errors.has_mismatch("maxSqft"));
    }

    #[test]
    fn test_admits_price() {
        let query = PropertyQuery {
            min_price: Some(100_000.0),
            max_price: Some(200_000.0),
            ..PropertyQuery::default()
        };
        assert!(query.admits_price(&DecimalText::parse("150000").unwrap()));
        assert!(query.admits_price(&DecimalText::parse("200000.00").unwrap()));
        assert!(!query.admits_price(&DecimalText::parse("99999.99").unwrap()));
        assert!(PropertyQuery::default().admits_price(&DecimalText::zero()));
    }
}
