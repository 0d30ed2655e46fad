//! Scalar values carried by filters and query parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single query-string-safe value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`, kept exact.
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Convert a JSON value. `null` yields `None`; arrays and objects are
    /// carried as their compact JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Scalar::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Scalar::Unsigned(u))
                } else {
                    n.as_f64().map(Scalar::Float)
                }
            }
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Some(Scalar::Text(value.to_string())),
        }
    }

    /// True for the empty string, the only scalar treated as "no value".
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }

    /// True when the value is a number or a string that parses as one.
    pub fn is_numeric(&self) -> bool {
        match self {
            Scalar::Integer(_) | Scalar::Unsigned(_) => true,
            Scalar::Float(f) => f.is_finite(),
            Scalar::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            Scalar::Bool(_) => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Unsigned(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Scalar::Integer)
            .unwrap_or(Scalar::Unsigned(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Scalar::from_json(&json!(10)), Some(Scalar::Integer(10)));
        assert_eq!(Scalar::from_json(&json!(2.5)), Some(Scalar::Float(2.5)));
        assert_eq!(Scalar::from_json(&json!(null)), None);
    }

    #[test]
    fn test_from_json_large_unsigned_is_exact() {
        let scalar = Scalar::from_json(&json!(18446744073709551615u64)).unwrap();
        assert_eq!(scalar, Scalar::Unsigned(u64::MAX));
        assert_eq!(scalar.to_string(), "18446744073709551615");
        assert!(scalar.is_numeric());
        assert_eq!(Scalar::from(7u64), Scalar::Integer(7));
    }

    #[test]
    fn test_from_json_structured_values_become_text() {
        assert_eq!(
            Scalar::from_json(&json!([1, 2])),
            Some(Scalar::Text("[1,2]".to_string()))
        );
    }

    #[test]
    fn test_blank_is_only_empty_string() {
        assert!(Scalar::from("").is_blank());
        assert!(!Scalar::from(" ").is_blank());
        assert!(!Scalar::from(0).is_blank());
    }

    #[test]
    fn test_is_numeric() {
        assert!(Scalar::from("12.5").is_numeric());
        assert!(Scalar::from(" 7 ").is_numeric());
        assert!(!Scalar::from("abc").is_numeric());
        assert!(!Scalar::from(true).is_numeric());
        assert!(!Scalar::Float(f64::NAN).is_numeric());
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::from(3).to_string(), "3");
        assert_eq!(Scalar::from(3.25).to_string(), "3.25");
        assert_eq!(Scalar::from("abc").to_string(), "abc");
    }
}
