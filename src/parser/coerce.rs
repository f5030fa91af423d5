//! Value coercion between raw field strings and typed values
//!
//! The forward direction maps a raw delimited field to a typed value through
//! an ordered rule chain (trim, null, boolean, number, string), each step
//! gated by its configuration toggle. Per-column type overrides replace the
//! default chain for that column. The inverse direction renders a typed value
//! back into unescaped field text.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Forced per-column type override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Keep the raw text as a string
    String,
    /// Parse as number, null on failure
    Number,
    /// Parse as boolean (`true`/`1`/`yes`, `false`/`0`/`no`), null otherwise
    Boolean,
    /// Parse into a normalized date representation, null on failure
    Date,
}

impl ColumnType {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "string" => Ok(ColumnType::String),
            "number" => Ok(ColumnType::Number),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "date" => Ok(ColumnType::Date),
            other => Err(format!(
                "Invalid column type '{}'. Use 'string', 'number', 'boolean', or 'date'",
                other
            )),
        }
    }
}

/// Toggles for the default coercion chain
#[derive(Debug, Clone, Copy)]
pub struct CoerceOptions {
    pub trim_values: bool,
    pub parse_numbers: bool,
    pub parse_booleans: bool,
    pub parse_nulls: bool,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            trim_values: true,
            parse_numbers: true,
            parse_booleans: true,
            parse_nulls: true,
        }
    }
}

/// Coerce a raw field string into a typed value.
///
/// First match wins: null, boolean, number, then string. A column override
/// replaces the boolean/number coercion entirely for that column.
pub fn coerce_field(raw: &str, column_type: Option<ColumnType>, opts: &CoerceOptions) -> Value {
    let text = if opts.trim_values { raw.trim() } else { raw };

    if let Some(forced) = column_type {
        return coerce_forced(text, forced);
    }

    if opts.parse_nulls && (text.is_empty() || text == "null" || text == "NULL") {
        return Value::Null;
    }

    if opts.parse_booleans {
        match text.to_lowercase().as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }

    if opts.parse_numbers {
        if let Some(number) = parse_number(text) {
            return number;
        }
    }

    Value::String(text.to_string())
}

/// Apply a forced column type to a field
fn coerce_forced(text: &str, column_type: ColumnType) -> Value {
    match column_type {
        ColumnType::String => Value::String(text.to_string()),
        ColumnType::Number => parse_number(text).unwrap_or(Value::Null),
        ColumnType::Boolean => match text.to_lowercase().as_str() {
            "true" | "1" | "yes" => Value::Bool(true),
            "false" | "0" | "no" => Value::Bool(false),
            _ => Value::Null,
        },
        ColumnType::Date => parse_date(text).map(Value::String).unwrap_or(Value::Null),
    }
}

/// Parse a finite numeric literal. Integers are kept exact where possible.
fn parse_number(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }

    let f = text.parse::<f64>().ok()?;
    if !f.is_finite() {
        return None;
    }
    serde_json::Number::from_f64(f).map(Value::Number)
}

/// Date formats accepted for the `date` column override, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date string into its normalized ISO-8601 representation
fn parse_date(text: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.to_rfc3339());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    None
}

/// Render a typed value back into unescaped field text.
///
/// Nulls become empty fields; special numeric values get their literal
/// tokens; non-empty containers are serialized structurally when
/// `flatten_objects` is set, otherwise joined into a compact one-line form.
pub fn value_to_field(value: &Value, flatten_objects: bool) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => format_special_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(a) if a.is_empty() => "[]".to_string(),
        Value::Object(o) if o.is_empty() => "{}".to_string(),
        Value::Array(a) => {
            if flatten_objects {
                serde_json::to_string(value).unwrap_or_default()
            } else {
                a.iter()
                    .map(|v| value_to_field(v, flatten_objects))
                    .collect::<Vec<_>>()
                    .join(";")
            }
        }
        Value::Object(o) => {
            if flatten_objects {
                serde_json::to_string(value).unwrap_or_default()
            } else {
                o.iter()
                    .map(|(k, v)| format!("{}:{}", k, value_to_field(v, flatten_objects)))
                    .collect::<Vec<_>>()
                    .join(";")
            }
        }
    }
}

/// Literal tokens for non-finite numbers
fn format_special_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_sign_positive() {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> CoerceOptions {
        CoerceOptions::default()
    }

    #[test]
    fn test_null_coercion() {
        assert_eq!(coerce_field("", None, &defaults()), Value::Null);
        assert_eq!(coerce_field("null", None, &defaults()), Value::Null);
        assert_eq!(coerce_field("NULL", None, &defaults()), Value::Null);
        assert_eq!(coerce_field("  ", None, &defaults()), Value::Null);
    }

    #[test]
    fn test_null_coercion_disabled() {
        let opts = CoerceOptions {
            parse_nulls: false,
            ..defaults()
        };
        assert_eq!(coerce_field("", None, &opts), Value::String(String::new()));
        assert_eq!(
            coerce_field("null", None, &opts),
            Value::String("null".to_string())
        );
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(coerce_field("true", None, &defaults()), Value::Bool(true));
        assert_eq!(coerce_field("FALSE", None, &defaults()), Value::Bool(false));
        assert_eq!(
            coerce_field("truthy", None, &defaults()),
            Value::String("truthy".to_string())
        );
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(coerce_field("42", None, &defaults()), json!(42));
        assert_eq!(coerce_field("-7", None, &defaults()), json!(-7));
        assert_eq!(coerce_field("3.14", None, &defaults()), json!(3.14));
        assert_eq!(coerce_field("1e3", None, &defaults()), json!(1000.0));
    }

    #[test]
    fn test_non_finite_stays_string() {
        assert_eq!(
            coerce_field("NaN", None, &defaults()),
            Value::String("NaN".to_string())
        );
        assert_eq!(
            coerce_field("Infinity", None, &defaults()),
            Value::String("Infinity".to_string())
        );
    }

    #[test]
    fn test_number_coercion_disabled() {
        let opts = CoerceOptions {
            parse_numbers: false,
            ..defaults()
        };
        assert_eq!(coerce_field("42", None, &opts), Value::String("42".to_string()));
    }

    #[test]
    fn test_trim_toggle() {
        assert_eq!(coerce_field(" 42 ", None, &defaults()), json!(42));

        let opts = CoerceOptions {
            trim_values: false,
            ..defaults()
        };
        assert_eq!(
            coerce_field(" 42 ", None, &opts),
            Value::String(" 42 ".to_string())
        );
    }

    #[test]
    fn test_forced_string() {
        assert_eq!(
            coerce_field("42", Some(ColumnType::String), &defaults()),
            Value::String("42".to_string())
        );
    }

    #[test]
    fn test_forced_number() {
        assert_eq!(
            coerce_field("42", Some(ColumnType::Number), &defaults()),
            json!(42)
        );
        assert_eq!(
            coerce_field("not a number", Some(ColumnType::Number), &defaults()),
            Value::Null
        );
    }

    #[test]
    fn test_forced_boolean() {
        for truthy in ["true", "1", "yes", "YES"] {
            assert_eq!(
                coerce_field(truthy, Some(ColumnType::Boolean), &defaults()),
                Value::Bool(true)
            );
        }
        for falsy in ["false", "0", "no"] {
            assert_eq!(
                coerce_field(falsy, Some(ColumnType::Boolean), &defaults()),
                Value::Bool(false)
            );
        }
        assert_eq!(
            coerce_field("maybe", Some(ColumnType::Boolean), &defaults()),
            Value::Null
        );
    }

    #[test]
    fn test_forced_date() {
        assert_eq!(
            coerce_field("2024-03-15", Some(ColumnType::Date), &defaults()),
            Value::String("2024-03-15".to_string())
        );
        assert_eq!(
            coerce_field("2024/03/15", Some(ColumnType::Date), &defaults()),
            Value::String("2024-03-15".to_string())
        );
        assert_eq!(
            coerce_field("03/15/2024", Some(ColumnType::Date), &defaults()),
            Value::String("2024-03-15".to_string())
        );
        assert_eq!(
            coerce_field("not a date", Some(ColumnType::Date), &defaults()),
            Value::Null
        );
    }

    #[test]
    fn test_column_type_from_str() {
        assert_eq!(ColumnType::from_str("number").unwrap(), ColumnType::Number);
        assert_eq!(ColumnType::from_str("BOOL").unwrap(), ColumnType::Boolean);
        assert!(ColumnType::from_str("integer").is_err());
    }

    #[test]
    fn test_value_to_field_scalars() {
        assert_eq!(value_to_field(&Value::Null, true), "");
        assert_eq!(value_to_field(&json!(true), true), "true");
        assert_eq!(value_to_field(&json!(42), true), "42");
        assert_eq!(value_to_field(&json!(3.5), true), "3.5");
        assert_eq!(value_to_field(&json!("hello"), true), "hello");
    }

    #[test]
    fn test_value_to_field_empty_containers() {
        assert_eq!(value_to_field(&json!([]), true), "[]");
        assert_eq!(value_to_field(&json!({}), true), "{}");
        assert_eq!(value_to_field(&json!([]), false), "[]");
        assert_eq!(value_to_field(&json!({}), false), "{}");
    }

    #[test]
    fn test_value_to_field_structured_serialization() {
        assert_eq!(value_to_field(&json!([1, 2, 3]), true), "[1,2,3]");
        assert_eq!(value_to_field(&json!({"a": 1}), true), "{\"a\":1}");
    }

    #[test]
    fn test_value_to_field_compact_form() {
        assert_eq!(value_to_field(&json!([1, 2, 3]), false), "1;2;3");
        assert_eq!(value_to_field(&json!({"a": 1, "b": 2}), false), "a:1;b:2");
    }

    #[test]
    fn test_format_special_number() {
        assert_eq!(format_special_number(f64::NAN), "NaN");
        assert_eq!(format_special_number(f64::INFINITY), "Infinity");
        assert_eq!(format_special_number(f64::NEG_INFINITY), "-Infinity");
    }
}
