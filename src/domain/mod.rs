//! Domain primitives for listings, appointments and agents.
//!
//! Closed tag sets (listing type, statuses) are modelled as enums so an
//! unknown value can only enter the system through a parse that fails.
//! Monetary and geographic quantities are kept as [`DecimalText`] to
//! preserve exactly what the client sent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a tag string is not one of the allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind} (expected one of: {expected})")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! closed_tag {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseTagError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: [$($text),+].join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

closed_tag! {
    /// Whether a listing is offered for sale or for rent.
    ListingType, "listing type" {
        Buy => "buy",
        Rent => "rent",
    }
}

closed_tag! {
    /// Availability of a listing.
    PropertyStatus, "property status" {
        Available => "available",
        Pending => "pending",
        Sold => "sold",
        Rented => "rented",
    }
}

closed_tag! {
    /// Lifecycle of a viewing appointment.
    AppointmentStatus, "appointment status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
}

impl Default for PropertyStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl AppointmentStatus {
    /// Returns true if an appointment may move from `self` to `next`.
    ///
    /// `cancelled` is terminal; `confirmed` can still be cancelled.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled) | (Self::Confirmed, Self::Cancelled)
        )
    }
}

/// A decimal number kept in its textual form.
///
/// Accepts an optional leading minus sign, digits, and an optional
/// fractional part. Exponents, `NaN` and infinities are rejected.
///
/// # Examples
///
/// ```rust
/// use homestead::domain::DecimalText;
///
/// let price = DecimalText::parse("250000.50").unwrap();
/// assert_eq!(price.as_str(), "250000.50");
/// assert!(DecimalText::parse("1e5").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecimalText(String);

impl DecimalText {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let int_ok = int_part.chars().all(|c| c.is_ascii_digit());
        let frac_ok = frac_part.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()));
        let has_digits = !int_part.is_empty() || frac_part.is_some_and(|f| !f.is_empty());

        (int_ok && frac_ok && has_digits).then(|| Self(trimmed.to_string()))
    }

    /// Renders a JSON number as decimal text without exponent notation.
    #[must_use]
    pub fn from_number(number: &serde_json::Number) -> Option<Self> {
        if let Some(i) = number.as_i64() {
            return Some(Self(i.to_string()));
        }
        if let Some(u) = number.as_u64() {
            return Some(Self(u.to_string()));
        }
        let f = number.as_f64()?;
        if !f.is_finite() {
            return None;
        }
        Self::parse(&format!("{f}"))
    }

    #[must_use]
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Numeric value, for comparisons only. Never store the result.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.parse().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.to_f64().abs() < f64::EPSILON
    }
}

impl fmt::Display for DecimalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DecimalText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DecimalText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a decimal number")))
    }
}

/// Folds one more score into an average, rounding to two decimals.
#[must_use]
pub fn fold_rating(current: &DecimalText, count: i32, score: u8) -> DecimalText {
    let count = f64::from(count.max(0));
    let total = current.to_f64().mul_add(count, f64::from(score));
    let average = total / (count + 1.0);
    DecimalText(format!("{average:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_type_parse() {
        assert_eq!("buy".parse::<ListingType>().unwrap(), ListingType::Buy);
        assert_eq!(" Rent ".parse::<ListingType>().unwrap(), ListingType::Rent);
        let err = "lease".parse::<ListingType>().unwrap_err();
        assert_eq!(err.kind, "listing type");
        assert!(err.to_string().contains("lease"));
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(PropertyStatus::default().as_str(), "available");
        assert_eq!(AppointmentStatus::default().as_str(), "pending");
    }

    #[test]
    fn test_appointment_transitions() {
        use AppointmentStatus::{Cancelled, Confirmed, Pending};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_decimal_text_parse() {
        assert_eq!(DecimalText::parse("250000").unwrap().as_str(), "250000");
        assert_eq!(DecimalText::parse("-122.4194").unwrap().as_str(), "-122.4194");
        assert_eq!(DecimalText::parse(".5").unwrap().as_str(), ".5");
        assert_eq!(DecimalText::parse(" 12.0 ").unwrap().as_str(), "12.0");
        assert!(DecimalText::parse("").is_none());
        assert!(DecimalText::parse("-").is_none());
        assert!(DecimalText::parse("12.").is_none());
        assert!(DecimalText::parse("abc").is_none());
        assert!(DecimalText::parse("NaN").is_none());
        assert!(DecimalText::parse("1,000").is_none());
    }

    #[test]
    fn test_decimal_text_from_number() {
        let n: serde_json::Number = serde_json::from_str("250000").unwrap();
        assert_eq!(DecimalText::from_number(&n).unwrap().as_str(), "250000");

        let n: serde_json::Number = serde_json::from_str("37.7749").unwrap();
        assert_eq!(DecimalText::from_number(&n).unwrap().as_str(), "37.7749");

        let n: serde_json::Number = serde_json::from_str("1e21").unwrap();
        assert_eq!(
            DecimalText::from_number(&n).unwrap().as_str(),
            "1000000000000000000000"
        );
    }

    #[test]
    fn test_fold_rating() {
        let first = fold_rating(&DecimalText::zero(), 0, 4);
        assert_eq!(first.as_str(), "4.00");

        let second = fold_rating(&first, 1, 5);
        assert_eq!(second.as_str(), "4.50");
    }
}
