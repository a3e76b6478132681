//! Field-level deserializers for producer data that is loosely typed.
//!
//! Each helper reads the raw JSON value first and only then tries the target
//! type, so a bad field never fails the record that contains it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings as-is, other scalars stringified, `null` and containers empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// The decoded value, or `T::default()` when it has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// `Some` only when the value decodes as `T`.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => serde_json::from_value(value).ok(),
    })
}

/// Non-negative integers, also when sent as a numeric string (`"42"`).
pub fn number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A list keeping only the elements that decode as `T`.
pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "string")]
        name: String,
        #[serde(deserialize_with = "optional")]
        flag: Option<bool>,
        #[serde(deserialize_with = "number")]
        count: Option<u64>,
        #[serde(deserialize_with = "list")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn scalars_are_stringified_and_null_is_empty() {
        let parsed: Sample = serde_json::from_value(json!({"name": 17})).unwrap();
        assert_eq!(parsed.name, "17");
        let parsed: Sample = serde_json::from_value(json!({"name": null})).unwrap();
        assert_eq!(parsed.name, "");
        let parsed: Sample = serde_json::from_value(json!({"name": {"x": 1}})).unwrap();
        assert_eq!(parsed.name, "");
    }

    #[test]
    fn wrong_type_becomes_none_without_touching_siblings() {
        let parsed: Sample =
            serde_json::from_value(json!({"name": "n", "flag": "yes", "count": 3})).unwrap();
        assert_eq!(parsed.flag, None);
        assert_eq!(parsed.name, "n");
        assert_eq!(parsed.count, Some(3));
    }

    #[test]
    fn numeric_strings_count_as_numbers() {
        let parsed: Sample = serde_json::from_value(json!({"count": " 42 "})).unwrap();
        assert_eq!(parsed.count, Some(42));
        let parsed: Sample = serde_json::from_value(json!({"count": -1})).unwrap();
        assert_eq!(parsed.count, None);
        let parsed: Sample = serde_json::from_value(json!({"count": "many"})).unwrap();
        assert_eq!(parsed.count, None);
    }

    #[test]
    fn lists_drop_bad_elements() {
        let parsed: Sample =
            serde_json::from_value(json!({"tags": ["a", null, 3, "b"]})).unwrap();
        assert_eq!(parsed.tags, Some(vec!["a".to_string(), "b".to_string()]));
        let parsed: Sample = serde_json::from_value(json!({"tags": "a"})).unwrap();
        assert_eq!(parsed.tags, None);
    }
}
