//! Payload extraction from request bodies.
//!
//! # Responsibilities
//! - Decode form-urlencoded bodies into structured payloads
//! - Decode JSON object bodies into structured payloads
//! - Keep every other body as a literal
//!
//! # Design Decisions
//! - Form values are scalar-coerced (`1` → integer, `true` → bool) so they
//!   compare equal to payloads declared with typed values
//! - Repeated form keys become lists

use std::collections::BTreeMap;

use bytes::Bytes;
use http::{header, HeaderMap};

use crate::matching::{Payload, PayloadValue};

/// Extract the payload of a request body. Empty bodies carry no payload.
pub fn payload_from_body(headers: &HeaderMap, body: &Bytes) -> Option<Payload> {
    if body.is_empty() {
        return None;
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .unwrap_or_default();

    if content_type == "application/x-www-form-urlencoded" {
        return Some(decode_form(body));
    }

    if content_type == "application/json" || content_type.ends_with("+json") {
        if let Ok(value @ serde_json::Value::Object(_)) = serde_json::from_slice::<serde_json::Value>(body) {
            return Some(Payload::from(value));
        }
    }

    Some(Payload::Literal(body.clone()))
}

/// Decode a form-urlencoded body.
pub fn decode_form(body: &[u8]) -> Payload {
    let mut grouped: BTreeMap<String, Vec<PayloadValue>> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        grouped.entry(key.into_owned()).or_default().push(coerce_scalar(&value));
    }

    Payload::structured(grouped.into_iter().map(|(key, mut values)| {
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            PayloadValue::List(values)
        };
        (key, value)
    }))
}

fn coerce_scalar(raw: &str) -> PayloadValue {
    if let Ok(i) = raw.parse::<i64>() {
        return PayloadValue::Integer(i);
    }
    match raw {
        "true" => PayloadValue::Bool(true),
        "false" => PayloadValue::Bool(false),
        _ => PayloadValue::Text(raw.to_string()),
    }
}
