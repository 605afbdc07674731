//! Conversion of fetched payloads into record text.

use serde_json::Value;

/// A response body as delivered by the content endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    /// Classify a raw body. Bodies that are JSON documents (an object or an
    /// array) become [`Payload::Json`]; everything else stays text, including
    /// bare JSON scalars such as `42` or `"x"`.
    pub fn sniff(body: String) -> Self {
        let trimmed = body.trim_start();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            return Payload::Text(body);
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Payload::Json(value),
            _ => Payload::Text(body),
        }
    }
}

/// Render a payload as record content.
///
/// Text passes through untouched. JSON is pretty-printed with two-space
/// indentation, keeping object keys in the order the source document used.
pub fn normalize(payload: Payload) -> String {
    match payload {
        Payload::Text(text) => text,
        Payload::Json(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
    }
}
