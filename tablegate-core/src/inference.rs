//! Column type inference from sample values.
//!
//! Used only when the backend cannot describe a table itself.

use crate::enums::FieldType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("timestamp pattern is valid")
});

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Guess the column type of a sample value.
///
/// Strings that *start* with `YYYY-MM-DD HH:MM:SS` are timestamps, so
/// fractional seconds or a zone suffix do not demote them to varchar.
/// Numbers with an integral value (including `3.0`) are ints.
pub fn infer_type(value: Option<&Value>) -> FieldType {
    match value {
        None | Some(Value::Null) => FieldType::Varchar,
        Some(Value::String(s)) => infer_string(s),
        Some(Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                FieldType::Int
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => FieldType::Int,
                    Some(_) => FieldType::Decimal,
                    None => FieldType::Varchar,
                }
            }
        }
        Some(_) => FieldType::Varchar,
    }
}

fn infer_string(s: &str) -> FieldType {
    if TIMESTAMP_PATTERN.is_match(s) {
        FieldType::Timestamp
    } else if DATE_PATTERN.is_match(s) {
        FieldType::Date
    } else {
        FieldType::Varchar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(value: Value) -> FieldType {
        infer_type(Some(&value))
    }

    #[test]
    fn test_infer_temporal_strings() {
        assert_eq!(infer(json!("2024-03-05 10:20:30")), FieldType::Timestamp);
        assert_eq!(infer(json!("2024-03-05 10:20:30.123")), FieldType::Timestamp);
        assert_eq!(infer(json!("2024-03-05")), FieldType::Date);
    }

    #[test]
    fn test_infer_near_miss_strings_are_varchar() {
        assert_eq!(infer(json!("2024-3-5")), FieldType::Varchar);
        assert_eq!(infer(json!("2024-03-05T10:20:30")), FieldType::Varchar);
        assert_eq!(infer(json!("2024-03-05 ")), FieldType::Varchar);
        assert_eq!(infer(json!("hello")), FieldType::Varchar);
    }

    #[test]
    fn test_infer_numbers() {
        assert_eq!(infer(json!(3)), FieldType::Int);
        assert_eq!(infer(json!(-7)), FieldType::Int);
        assert_eq!(infer(json!(3.0)), FieldType::Int);
        assert_eq!(infer(json!(3.14)), FieldType::Decimal);
    }

    #[test]
    fn test_infer_null_and_other() {
        assert_eq!(infer_type(None), FieldType::Varchar);
        assert_eq!(infer(json!(null)), FieldType::Varchar);
        assert_eq!(infer(json!(true)), FieldType::Varchar);
        assert_eq!(infer(json!({"a": 1})), FieldType::Varchar);
        assert_eq!(infer(json!([1])), FieldType::Varchar);
    }
}
