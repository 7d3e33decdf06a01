//! Scalar coercion rules.
//!
//! Each function returns the normalized value, or `None` when the input
//! cannot be read as the target type. Lax mode accepts the usual textual
//! and numeric spellings; strict mode accepts exact JSON types only.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};
use uuid::Uuid;

use super::validator::ValidationMode;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub(crate) fn coerce_string(value: &Value, _mode: ValidationMode) -> Option<Value> {
    value.is_string().then(|| value.clone())
}

pub(crate) fn coerce_int(value: &Value, mode: ValidationMode) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() => Some(value.clone()),
        Value::Number(n) if mode.is_lax() => {
            let f = n.as_f64()?;
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(Value::from(f as i64))
            } else {
                None
            }
        }
        Value::String(s) if mode.is_lax() => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

pub(crate) fn coerce_float(value: &Value, mode: ValidationMode) -> Option<Value> {
    match value {
        Value::Number(n) => n.as_f64().and_then(Number::from_f64).map(Value::Number),
        Value::String(s) if mode.is_lax() => {
            let f = s.trim().parse::<f64>().ok()?;
            Number::from_f64(f).map(Value::Number)
        }
        _ => None,
    }
}

pub(crate) fn coerce_bool(value: &Value, mode: ValidationMode) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(n) if mode.is_lax() => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        Value::String(s) if mode.is_lax() => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn coerce_datetime(value: &Value, mode: ValidationMode) -> Option<Value> {
    match value {
        Value::String(s) => parse_datetime(s.trim(), mode).map(Value::String),
        Value::Number(n) if mode.is_lax() => {
            let secs = n.as_i64()?;
            let dt = DateTime::<Utc>::from_timestamp(secs, 0)?;
            Some(Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
        }
        _ => None,
    }
}

fn parse_datetime(text: &str, mode: ValidationMode) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, NAIVE_FORMAT) {
        return Some(naive.format(NAIVE_FORMAT).to_string());
    }
    if !mode.is_lax() {
        return None;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.format(NAIVE_FORMAT).to_string());
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.format(NAIVE_FORMAT).to_string())
}

pub(crate) fn coerce_uuid(value: &Value, _mode: ValidationMode) -> Option<Value> {
    let text = value.as_str()?;
    let id = Uuid::parse_str(text.trim()).ok()?;
    Some(Value::String(id.hyphenated().to_string()))
}

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => format!("bool {}", b),
        Value::Number(n) if n.is_i64() || n.is_u64() => format!("int {}", n),
        Value::Number(n) => format!("float {}", n),
        Value::String(s) => {
            let shown: String = s.chars().take(32).collect();
            if shown.len() < s.len() {
                format!("string {:?}...", shown)
            } else {
                format!("string {:?}", shown)
            }
        }
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LAX: ValidationMode = ValidationMode::Lax;
    const STRICT: ValidationMode = ValidationMode::Strict;

    #[test]
    fn test_int_coercion() {
        assert_eq!(coerce_int(&json!(7), LAX), Some(json!(7)));
        assert_eq!(coerce_int(&json!(7.0), LAX), Some(json!(7)));
        assert_eq!(coerce_int(&json!(" 42 "), LAX), Some(json!(42)));
        assert_eq!(coerce_int(&json!(7.5), LAX), None);
        assert_eq!(coerce_int(&json!("seven"), LAX), None);
        assert_eq!(coerce_int(&json!(7.0), STRICT), None);
        assert_eq!(coerce_int(&json!("42"), STRICT), None);
    }

    #[test]
    fn test_int_range_is_signed_64_bit() {
        assert_eq!(coerce_int(&json!(i64::MAX), STRICT), Some(json!(i64::MAX)));
        assert_eq!(coerce_int(&json!(i64::MIN), LAX), Some(json!(i64::MIN)));
        assert_eq!(coerce_int(&json!(u64::MAX), LAX), None);
        assert_eq!(coerce_int(&json!(u64::MAX), STRICT), None);
        assert_eq!(coerce_int(&json!(9223372036854775808.0f64), LAX), None);
        assert_eq!(coerce_int(&json!(-9223372036854775808.0f64), LAX), Some(json!(i64::MIN)));
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(coerce_float(&json!(9.99), LAX), Some(json!(9.99)));
        assert_eq!(coerce_float(&json!(100), LAX), Some(json!(100.0)));
        assert_eq!(coerce_float(&json!("9.99"), LAX), Some(json!(9.99)));
        assert_eq!(coerce_float(&json!("free"), LAX), None);
        assert_eq!(coerce_float(&json!("inf"), LAX), None);
        assert_eq!(coerce_float(&json!("9.99"), STRICT), None);
        assert_eq!(coerce_float(&json!(3), STRICT), Some(json!(3.0)));
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(coerce_bool(&json!("Yes"), LAX), Some(json!(true)));
        assert_eq!(coerce_bool(&json!("off"), LAX), Some(json!(false)));
        assert_eq!(coerce_bool(&json!(1), LAX), Some(json!(true)));
        assert_eq!(coerce_bool(&json!(2), LAX), None);
        assert_eq!(coerce_bool(&json!("yes"), STRICT), None);
    }

    #[test]
    fn test_string_is_never_coerced() {
        assert_eq!(coerce_string(&json!(12), LAX), None);
        assert_eq!(coerce_string(&json!("12"), LAX), Some(json!("12")));
    }

    #[test]
    fn test_datetime_coercion() {
        assert_eq!(
            coerce_datetime(&json!("2021-01-01T00:00:00"), LAX),
            Some(json!("2021-01-01T00:00:00"))
        );
        assert_eq!(
            coerce_datetime(&json!("2021-01-01T10:30:00.250"), STRICT),
            Some(json!("2021-01-01T10:30:00.250"))
        );
        assert_eq!(
            coerce_datetime(&json!("2021-01-01T00:00:00+00:00"), LAX),
            Some(json!("2021-01-01T00:00:00Z"))
        );
        assert_eq!(
            coerce_datetime(&json!("2021-01-01"), LAX),
            Some(json!("2021-01-01T00:00:00"))
        );
        assert_eq!(coerce_datetime(&json!(0), LAX), Some(json!("1970-01-01T00:00:00Z")));
        assert_eq!(coerce_datetime(&json!("2021-01-01"), STRICT), None);
        assert_eq!(coerce_datetime(&json!("yesterday"), LAX), None);
    }

    #[test]
    fn test_uuid_coercion() {
        assert_eq!(
            coerce_uuid(&json!("67E55044-10B1-426F-9247-BB680E5FE0C8"), LAX),
            Some(json!("67e55044-10b1-426f-9247-bb680e5fe0c8"))
        );
        assert_eq!(
            coerce_uuid(&json!("67e5504410b1426f9247bb680e5fe0c8"), LAX),
            Some(json!("67e55044-10b1-426f-9247-bb680e5fe0c8"))
        );
        assert_eq!(coerce_uuid(&json!("not-a-uuid"), LAX), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!("free")), "string \"free\"");
        assert_eq!(describe(&json!(3)), "int 3");
        assert_eq!(describe(&json!([1])), "array");
    }
}
