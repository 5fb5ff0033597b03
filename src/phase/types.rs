//! Field type checking shared by every phase validator.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{Issue, Num};

/// Display-level type of a decoded JSON value.
///
/// Integers and floats are kept apart so a field can accept one or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Number,
    Float,
    List,
    Map,
    Bool,
    Null,
}

impl JsonType {
    /// Classifies a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Number,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Map,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Float => "float",
            Self::List => "list",
            Self::Map => "map",
            Self::Bool => "bool",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const STRING: &[JsonType] = &[JsonType::String];
pub const NUMBER: &[JsonType] = &[JsonType::Number];
pub const NUMERIC: &[JsonType] = &[JsonType::Number, JsonType::Float];
pub const LIST: &[JsonType] = &[JsonType::List];
pub const MAP: &[JsonType] = &[JsonType::Map];

/// Checks that `record[key]` exists and has one of the `expected` types.
///
/// A missing key yields [`Issue::MissingField`] only when `required`; a
/// present key of another type yields [`Issue::WrongType`]. Issues are
/// reported at `prefix.key`.
pub fn check_type(
    record: &Map<String, Value>,
    prefix: &str,
    key: &str,
    expected: &[JsonType],
    required: bool,
) -> Vec<Issue> {
    match record.get(key) {
        None if required => vec![Issue::missing(field(prefix, key))],
        None => Vec::new(),
        Some(value) => {
            let actual = JsonType::of(value);
            if expected.contains(&actual) {
                Vec::new()
            } else {
                vec![Issue::wrong_type(field(prefix, key), expected, actual)]
            }
        }
    }
}

/// Checks a required string field that must also be non-empty.
pub fn check_non_empty(record: &Map<String, Value>, prefix: &str, key: &str) -> Vec<Issue> {
    let mut issues = check_type(record, prefix, key, STRING, true);
    if issues.is_empty() && record.get(key).and_then(Value::as_str) == Some("") {
        issues.push(Issue::empty_string(field(prefix, key)));
    }
    issues
}

/// Checks an optional numeric field against an inclusive range.
///
/// Only numbers are range-checked; type mismatches are left to
/// [`check_type`].
pub fn check_range(
    record: &Map<String, Value>,
    prefix: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Option<Issue> {
    let value = record.get(key).and_then(Value::as_f64)?;
    if value < min || value > max {
        Some(Issue::out_of_range(field(prefix, key), value, min, max))
    } else {
        None
    }
}

/// Checks an optional string field against a closed set.
pub fn check_enum(
    record: &Map<String, Value>,
    prefix: &str,
    key: &str,
    allowed: &'static [&'static str],
) -> Vec<Issue> {
    let mut issues = check_type(record, prefix, key, STRING, false);
    if let Some(value) = record.get(key).and_then(Value::as_str) {
        if !allowed.contains(&value) {
            issues.push(Issue::not_in_enum(field(prefix, key), value, allowed));
        }
    }
    issues
}

/// Returns the map behind `value`, or a wrong-type issue at `path`.
pub fn expect_map<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, Issue> {
    value
        .as_object()
        .ok_or_else(|| Issue::wrong_type(path, MAP, JsonType::of(value)))
}

/// Display label for a scene id: strings unquoted, everything else as JSON.
pub fn id_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Key under which scene ids are compared for duplicates.
///
/// Numbers compare by value, so `1` and `1.0` collide; strings never
/// collide with numbers.
pub fn id_key(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => format!("n:{}", Num(f)),
            None => format!("n:{}", n),
        },
        Value::String(s) => format!("s:{}", s),
        other => other.to_string(),
    }
}

/// Path of a map field: `prefix.key`.
pub fn field(prefix: &str, key: &str) -> String {
    format!("{}.{}", prefix, key)
}

/// Path of a list element: `prefix[index]`.
pub fn item(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_json_type_of() {
        assert_eq!(JsonType::of(&json!("a")), JsonType::String);
        assert_eq!(JsonType::of(&json!(3)), JsonType::Number);
        assert_eq!(JsonType::of(&json!(3.5)), JsonType::Float);
        assert_eq!(JsonType::of(&json!([])), JsonType::List);
        assert_eq!(JsonType::of(&json!({})), JsonType::Map);
        assert_eq!(JsonType::of(&json!(true)), JsonType::Bool);
        assert_eq!(JsonType::of(&Value::Null), JsonType::Null);
    }

    #[test]
    fn test_missing_required() {
        let rec = record(json!({}));
        let issues = check_type(&rec, "context", "setting", STRING, true);
        assert_eq!(issues, vec![Issue::missing("context.setting")]);
        assert_eq!(issues[0].to_string(), "context.setting: missing required field");
    }

    #[test]
    fn test_missing_optional_is_silent() {
        let rec = record(json!({}));
        assert!(check_type(&rec, "context", "ng", LIST, false).is_empty());
    }

    #[test]
    fn test_wrong_type() {
        let rec = record(json!({ "intensity": "high" }));
        let issues = check_type(&rec, "outline[2]", "intensity", NUMERIC, true);
        assert_eq!(
            issues[0].to_string(),
            "outline[2].intensity: expected number or float, got string"
        );
    }

    #[test]
    fn test_numeric_accepts_int_and_float() {
        let rec = record(json!({ "a": 1, "b": 2.5 }));
        assert!(check_type(&rec, "x", "a", NUMERIC, true).is_empty());
        assert!(check_type(&rec, "x", "b", NUMERIC, true).is_empty());
        assert_eq!(check_type(&rec, "x", "b", NUMBER, true).len(), 1);
    }

    #[test]
    fn test_non_empty() {
        let rec = record(json!({ "name": "", "other": "x" }));
        assert_eq!(
            check_non_empty(&rec, "c", "name"),
            vec![Issue::empty_string("c.name")]
        );
        assert!(check_non_empty(&rec, "c", "other").is_empty());
        assert_eq!(check_non_empty(&rec, "c", "gone"), vec![Issue::missing("c.gone")]);
    }

    #[test]
    fn test_id_label() {
        assert_eq!(id_label(&json!(4)), "4");
        assert_eq!(id_label(&json!("s-4")), "s-4");
        assert_eq!(id_label(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_id_key_compares_numbers_by_value() {
        assert_eq!(id_key(&json!(1)), id_key(&json!(1.0)));
        assert_ne!(id_key(&json!(1)), id_key(&json!("1")));
        assert_ne!(id_key(&json!(1)), id_key(&json!(1.5)));
    }

    #[test]
    fn test_range_and_enum() {
        let rec = record(json!({ "intensity": 6, "level": "extreme" }));
        let issue = check_range(&rec, "o", "intensity", 1.0, 5.0).unwrap();
        assert_eq!(issue.to_string(), "o.intensity: value 6 out of range [1, 5]");

        let issues = check_enum(&rec, "o", "level", &["none", "light"]);
        assert_eq!(issues.len(), 1);
        assert!(check_enum(&rec, "o", "absent", &["none"]).is_empty());
    }
}
