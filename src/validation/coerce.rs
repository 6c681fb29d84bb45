//! Single-value coercions.
//!
//! Each function takes one present, non-null JSON value and returns the
//! canonical value or a message fragment such as `"must be a whole number"`.
//! [`super::FieldReader`] prefixes the field name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::domain::{DecimalText, ParseTagError};

pub fn text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "must be a string".to_string())
}

/// Number → its decimal text; string → kept verbatim if it is decimal text.
pub fn decimal(value: &Value) -> Result<DecimalText, String> {
    match value {
        Value::Number(n) => {
            DecimalText::from_number(n).ok_or_else(|| "must be a finite number".to_string())
        }
        Value::String(s) => {
            DecimalText::parse(s).ok_or_else(|| format!("must be a decimal number, got '{s}'"))
        }
        _ => Err("must be a number or a numeric string".to_string()),
    }
}

/// Number or numeric string → whole number.
pub fn integer(value: &Value) -> Result<i32, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map_err(|_| "is out of range".to_string());
            }
            if n.is_u64() {
                return Err("is out of range".to_string());
            }
            n.as_f64()
                .ok_or_else(|| "must be a whole number".to_string())
                .and_then(integral)
        }
        Value::String(s) => parse_integer(s),
        _ => Err("must be a number or a numeric string".to_string()),
    }
}

fn parse_integer(raw: &str) -> Result<i32, String> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return i32::try_from(i).map_err(|_| "is out of range".to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => integral(f),
        _ => Err(format!("must be a number, got '{raw}'")),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Result<i32, String> {
    if f.fract() != 0.0 {
        return Err("must be a whole number".to_string());
    }
    if f < f64::from(i32::MIN) || f > f64::from(i32::MAX) {
        return Err("is out of range".to_string());
    }
    Ok(f as i32)
}

/// A whole number that cannot be negative.
pub fn count(value: &Value) -> Result<i32, String> {
    let n = integer(value)?;
    if n < 0 {
        return Err("must not be negative".to_string());
    }
    Ok(n)
}

/// Like [`integer`], but an empty string means "no value".
pub fn optional_integer(value: &Value) -> Result<Option<i32>, String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Ok(None),
        other => integer(other).map(Some),
    }
}

/// A row reference. Must be a positive integer.
pub fn id(value: &Value) -> Result<i32, String> {
    let n = integer(value)?;
    if n <= 0 {
        return Err("must be a positive id".to_string());
    }
    Ok(n)
}

pub fn flag(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(format!("must be true or false, got '{s}'")),
        },
        _ => Err("must be a boolean".to_string()),
    }
}

pub fn tag<T>(value: &Value) -> Result<T, String>
where
    T: std::str::FromStr<Err = ParseTagError>,
{
    let raw = value.as_str().ok_or_else(|| "must be a string".to_string())?;
    raw.parse::<T>()
        .map_err(|e| format!("must be one of: {} (got '{}')", e.expected, e.value))
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (read as UTC), or a bare date
/// (midnight UTC).
pub fn datetime(value: &Value) -> Result<DateTime<Utc>, String> {
    let raw = value
        .as_str()
        .ok_or_else(|| "must be a date string".to_string())?
        .trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(format!("is not a valid date: '{raw}'"))
}

/// Saved-property ids arrive as an array, `"1,2,3"`, or `"[1,2,3]"`.
///
/// Duplicates are dropped; first occurrence wins.
pub fn id_list(value: &Value) -> Result<Vec<i32>, String> {
    let items: Vec<i32> = match value {
        Value::Array(values) => values.iter().map(id).collect::<Result<_, _>>()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                let values: Vec<Value> = serde_json::from_str(trimmed)
                    .map_err(|_| format!("is not a valid id list: '{s}'"))?;
                values.iter().map(id).collect::<Result<_, _>>()?
            } else {
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| id(&Value::String(part.to_string())))
                    .collect::<Result<_, _>>()?
            }
        }
        _ => return Err("must be a list of ids or a comma-separated string".to_string()),
    };

    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingType;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        assert_eq!(decimal(&json!(250_000)).unwrap().as_str(), "250000");
        assert_eq!(decimal(&json!("250000.50")).unwrap().as_str(), "250000.50");
        assert_eq!(decimal(&json!(-122.4194)).unwrap().as_str(), "-122.4194");
        assert!(decimal(&json!("cheap")).is_err());
        assert!(decimal(&json!(true)).is_err());
    }

    #[test]
    fn test_integer_parses_strings() {
        assert_eq!(integer(&json!("3")).unwrap(), 3);
        assert_eq!(integer(&json!(" 12 ")).unwrap(), 12);
        assert_eq!(integer(&json!(4)).unwrap(), 4);
        assert_eq!(integer(&json!(2.0)).unwrap(), 2);
        assert!(integer(&json!("three")).is_err());
        assert!(integer(&json!(2.5)).is_err());
        assert!(integer(&json!("2.5")).is_err());
        assert!(integer(&json!("")).is_err());
        assert!(integer(&json!("inf")).is_err());
        assert!(integer(&json!(10_000_000_000_i64)).is_err());
    }

    #[test]
    fn test_integer_out_of_range_message() {
        let huge: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(integer(&huge).unwrap_err(), "is out of range");
        assert_eq!(integer(&json!(10_000_000_000_i64)).unwrap_err(), "is out of range");
        assert_eq!(integer(&json!(1e12)).unwrap_err(), "is out of range");
        assert_eq!(integer(&json!("99999999999")).unwrap_err(), "is out of range");
        assert_eq!(integer(&json!(2.5)).unwrap_err(), "must be a whole number");
    }

    #[test]
    fn test_count_rejects_negative() {
        assert_eq!(count(&json!(0)).unwrap(), 0);
        assert_eq!(count(&json!(-1)).unwrap_err(), "must not be negative");
    }

    #[test]
    fn test_optional_integer_empty_string() {
        assert_eq!(optional_integer(&json!("")).unwrap(), None);
        assert_eq!(optional_integer(&json!("1998")).unwrap(), Some(1998));
        assert_eq!(optional_integer(&json!(2005)).unwrap(), Some(2005));
        assert!(optional_integer(&json!("nineties")).is_err());
    }

    #[test]
    fn test_id_must_be_positive() {
        assert_eq!(id(&json!(7)).unwrap(), 7);
        assert!(id(&json!(0)).is_err());
        assert!(id(&json!(-3)).is_err());
    }

    #[test]
    fn test_flag() {
        assert!(flag(&json!(true)).unwrap());
        assert!(!flag(&json!("false")).unwrap());
        assert!(flag(&json!("yes")).is_err());
        assert!(flag(&json!(1)).is_err());
    }

    #[test]
    fn test_tag_message_lists_allowed_values() {
        assert_eq!(tag::<ListingType>(&json!("RENT")).unwrap(), ListingType::Rent);
        let err = tag::<ListingType>(&json!("lease")).unwrap_err();
        assert_eq!(err, "must be one of: buy, rent (got 'lease')");
    }

    #[test]
    fn test_datetime_formats() {
        let expected = "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(datetime(&json!("2024-05-01T10:00:00Z")).unwrap(), expected);
        assert_eq!(
            datetime(&json!("2024-05-01T12:00:00+02:00")).unwrap(),
            expected
        );
        assert_eq!(datetime(&json!("2024-05-01T10:00")).unwrap(), expected);

        let midnight = "2024-05-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(datetime(&json!("2024-05-01")).unwrap(), midnight);

        assert!(datetime(&json!("not-a-date")).is_err());
        assert!(datetime(&json!("2024-13-01")).is_err());
        assert!(datetime(&json!(1_714_557_600)).is_err());
    }

    #[test]
    fn test_id_list_shapes() {
        assert_eq!(id_list(&json!([3, 1, 3])).unwrap(), vec![3, 1]);
        assert_eq!(id_list(&json!("4, 5,6")).unwrap(), vec![4, 5, 6]);
        assert_eq!(id_list(&json!("[7,8]")).unwrap(), vec![7, 8]);
        assert_eq!(id_list(&json!("")).unwrap(), Vec::<i32>::new());
        assert!(id_list(&json!("1,two")).is_err());
        assert!(id_list(&json!({ "a": 1 })).is_err());
    }
}
