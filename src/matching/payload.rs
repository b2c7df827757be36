//! Request payload normalization.
//!
//! Structured payloads are stored as ordered maps with string keys and
//! recursively normalized values, so a payload built from a decoded form,
//! a JSON document or a literal map in test code all compare equal when they
//! carry the same data. Anything else is an opaque literal that must match
//! byte for byte.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// A value inside a structured payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Text, and numbers that do not fit an `i64` in their textual form.
    Text(String),
    List(Vec<PayloadValue>),
    Map(BTreeMap<String, PayloadValue>),
}

impl PayloadValue {
    /// Build a nested mapping, coercing every key to its string form.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: Into<PayloadValue>,
    {
        PayloadValue::Map(normalize_entries(entries))
    }
}

fn normalize_entries<I, K, V>(entries: I) -> BTreeMap<String, PayloadValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: fmt::Display,
    V: Into<PayloadValue>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.into()))
        .collect()
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Bool(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Integer(value)
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        PayloadValue::Integer(value.into())
    }
}

impl From<u32> for PayloadValue {
    fn from(value: u32) -> Self {
        PayloadValue::Integer(value.into())
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Text(value)
    }
}

impl<T: Into<PayloadValue>> From<Vec<T>> for PayloadValue {
    fn from(values: Vec<T>) -> Self {
        PayloadValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PayloadValue>> From<Option<T>> for PayloadValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PayloadValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for PayloadValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => PayloadValue::Null,
            Value::Bool(b) => PayloadValue::Bool(b),
            Value::Number(n) => match n.as_i64().or_else(|| n.as_f64().and_then(whole_float)) {
                Some(i) => PayloadValue::Integer(i),
                None => PayloadValue::Text(n.to_string()),
            },
            Value::String(s) => PayloadValue::Text(s),
            Value::Array(items) => PayloadValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => PayloadValue::map(map),
        }
    }
}

/// `1.0` decodes to the same value as `1`.
fn whole_float(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// A normalized request payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// Key/value data, e.g. a decoded form body.
    Structured(BTreeMap<String, PayloadValue>),
    /// Raw body bytes, matched literally.
    Literal(Bytes),
}

impl Payload {
    /// Build a structured payload, coercing every key to its string form.
    pub fn structured<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: Into<PayloadValue>,
    {
        Payload::Structured(normalize_entries(entries))
    }

    pub fn literal(body: impl Into<Bytes>) -> Self {
        Payload::Literal(body.into())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Payload::Structured(_))
    }
}

impl From<&str> for Payload {
    fn from(body: &str) -> Self {
        Payload::literal(body.to_string())
    }
}

impl From<String> for Payload {
    fn from(body: String) -> Self {
        Payload::literal(body)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(body: Vec<u8>) -> Self {
        Payload::literal(body)
    }
}

impl From<Bytes> for Payload {
    fn from(body: Bytes) -> Self {
        Payload::Literal(body)
    }
}

impl From<serde_json::Value> for Payload {
    /// Objects become structured payloads; strings are literal bodies; any
    /// other JSON value is matched by its serialized text.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Payload::structured(map),
            serde_json::Value::String(s) => Payload::literal(s),
            other => Payload::literal(other.to_string()),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Structured(map) => {
                let json = serde_json::to_string(map).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Payload::Literal(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_coerced_to_strings() {
        let numeric = Payload::structured([(1, "one"), (2, "two")]);
        let textual = Payload::structured([("1", "one"), ("2", "two")]);
        assert_eq!(numeric, textual);
    }

    #[test]
    fn test_nested_payload_matches_json() {
        let built = Payload::structured([
            ("a", PayloadValue::from(1)),
            ("nested", PayloadValue::map([("b", true)])),
        ]);
        let decoded = Payload::from(json!({ "nested": { "b": true }, "a": 1 }));
        assert_eq!(built, decoded);
    }

    #[test]
    fn test_entry_order_is_irrelevant() {
        let a = Payload::structured([("a", 1), ("b", 1)]);
        let b = Payload::structured([("b", 1), ("a", 1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_literal_never_equals_structured() {
        let literal = Payload::from("hello world");
        let structured = Payload::structured([("hello world", "")]);
        assert_ne!(literal, structured);
        assert!(!literal.is_structured());
    }

    #[test]
    fn test_non_integer_numbers_kept_as_text() {
        let value = PayloadValue::from(json!(1.5));
        assert_eq!(value, PayloadValue::Text("1.5".into()));
    }

    #[test]
    fn test_whole_floats_equal_integers() {
        let float = Payload::from(json!({ "a": 1.0, "b": [2.0, -3.0] }));
        let integer = Payload::from(json!({ "a": 1, "b": [2, -3] }));
        assert_eq!(float, integer);
        assert!(matches!(PayloadValue::from(json!(1e300)), PayloadValue::Text(_)));
    }

    #[test]
    fn test_display() {
        let payload = Payload::structured([("b", 2), ("a", 1)]);
        assert_eq!(payload.to_string(), r#"{"a":1,"b":2}"#);
        assert_eq!(Payload::from("hi").to_string(), r#""hi""#);
    }
}
