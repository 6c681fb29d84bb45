//! Boundary validation for client payloads.
//!
//! Client input is loosely typed: numbers may arrive as strings, dates as
//! strings, id lists as delimited text. Everything in this module turns a raw
//! [`serde_json::Value`] into one canonical Rust shape, or into a
//! [`ValidationErrors`] listing every field that failed. Nothing here touches
//! the database.

pub mod coerce;
pub mod filter;
pub mod insert;

pub use filter::{PropertyFilter, PropertyQuery, validate_filter};
pub use insert::{
    CanonicalEntity, EntityDefaults, EntityKind, NewAgent, NewAppointment, NewProperty, NewUser,
    validate_insert, validate_insert_with,
};

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field is absent, `null`, or empty.
    MissingField,
    /// A field is present but cannot be coerced to its expected kind.
    ShapeMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Every field-level failure found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn missing(&mut self, field: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            kind: ErrorKind::MissingField,
            message: format!("{field} is required"),
        });
    }

    pub fn mismatch(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            kind: ErrorKind::ShapeMismatch,
            message: message.into(),
        });
    }

    /// Builds a single-error set, for callers outside the payload decoders.
    #[must_use]
    pub fn single(field: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.to_string(),
                kind,
                message: message.into(),
            }],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Finds the error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// True if `field` failed with [`ErrorKind::ShapeMismatch`].
    #[must_use]
    pub fn has_mismatch(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.kind == ErrorKind::ShapeMismatch)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// Returns `value` if no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Reads named fields out of a JSON object, recording failures as it goes.
///
/// Each accessor returns `None` both when the field is legitimately absent
/// and when it failed; [`FieldReader::finish`] decides which one happened.
pub struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    /// Fails with a single `payload` error if `raw` is not a JSON object.
    pub fn new(raw: &'a Value) -> Result<Self, ValidationErrors> {
        raw.as_object()
            .map(|map| Self {
                map,
                errors: ValidationErrors::new(),
            })
            .ok_or_else(|| {
                ValidationErrors::single(
                    "payload",
                    ErrorKind::ShapeMismatch,
                    "payload must be a JSON object",
                )
            })
    }

    /// Present and non-null value for `name`.
    fn present(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    /// Like [`Self::present`], but a blank string also counts as absent.
    /// Every optional accessor reads through this.
    fn optional(&self, name: &str) -> Option<&'a Value> {
        self.present(name)
            .filter(|v| !v.as_str().is_some_and(|s| s.trim().is_empty()))
    }

    fn require(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.present(name);
        if value.is_none() {
            self.errors.missing(name);
        }
        value
    }

    fn record<T>(&mut self, name: &str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(v) => Some(v),
            Err(message) => {
                self.errors.mismatch(name, format!("{name} {message}"));
                None
            }
        }
    }

    pub fn required_text(&mut self, name: &str) -> Option<String> {
        let value = self.require(name)?;
        let text = self.record(name, coerce::text(value))?;
        if text.trim().is_empty() {
            self.errors.missing(name);
            return None;
        }
        Some(text)
    }

    /// Absent, `null` and `""` all read as `None`, as for every other
    /// `optional_*` accessor.
    pub fn optional_text(&mut self, name: &str) -> Option<String> {
        let value = self.optional(name)?;
        self.record(name, coerce::text(value))
    }

    pub fn required_decimal(&mut self, name: &str) -> Option<crate::domain::DecimalText> {
        let value = self.require(name)?;
        self.record(name, coerce::decimal(value))
    }

    pub fn optional_decimal(&mut self, name: &str) -> Option<crate::domain::DecimalText> {
        let value = self.optional(name)?;
        self.record(name, coerce::decimal(value))
    }

    pub fn required_count(&mut self, name: &str) -> Option<i32> {
        let value = self.require(name)?;
        self.record(name, coerce::count(value))
    }

    pub fn optional_count(&mut self, name: &str) -> Option<i32> {
        let value = self.optional(name)?;
        self.record(name, coerce::count(value))
    }

    pub fn optional_year(&mut self, name: &str) -> Option<i32> {
        let value = self.optional(name)?;
        self.record(name, coerce::optional_integer(value)).flatten()
    }

    pub fn required_id(&mut self, name: &str) -> Option<i32> {
        let value = self.require(name)?;
        self.record(name, coerce::id(value))
    }

    pub fn required_datetime(&mut self, name: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        let value = self.require(name)?;
        self.record(name, coerce::datetime(value))
    }

    pub fn optional_flag(&mut self, name: &str) -> Option<bool> {
        let value = self.optional(name)?;
        self.record(name, coerce::flag(value))
    }

    pub fn required_tag<T>(&mut self, name: &str) -> Option<T>
    where
        T: std::str::FromStr<Err = crate::domain::ParseTagError>,
    {
        let value = self.require(name)?;
        self.record(name, coerce::tag(value))
    }

    pub fn optional_tag<T>(&mut self, name: &str) -> Option<T>
    where
        T: std::str::FromStr<Err = crate::domain::ParseTagError>,
    {
        let value = self.optional(name)?;
        self.record(name, coerce::tag(value))
    }

    pub fn optional_id_list(&mut self, name: &str) -> Option<Vec<i32>> {
        let value = self.optional(name)?;
        self.record(name, coerce::id_list(value))
    }

    /// Records an extra constraint failure found by the caller.
    pub fn reject(&mut self, name: &str, message: impl Into<String>) {
        self.errors.mismatch(name, message);
    }

    /// Keys present in the payload that are not in `known`.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<&'a str> {
        self.map
            .keys()
            .map(String::as_str)
            .filter(|k| !known.iter().any(|known| known == k))
            .collect()
    }

    /// Yields the built value, or every recorded error.
    ///
    /// `build` runs only when no error was recorded, so it may assume every
    /// required accessor returned `Some`.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        build().ok_or_else(|| {
            ValidationErrors::single(
                "payload",
                ErrorKind::ShapeMismatch,
                "payload could not be assembled",
            )
        })
    }
}
