use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key carrying the human-readable one-line description of a header.
pub const SUMMARY_KEY: &str = "_summary";

/// A protocol header: an ordered mapping from field name to value.
///
/// Keys starting with `_` are metadata. They are kept in the object (and so
/// remain visible to filter predicates) but are never displayed as rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Header {
    fields: Vec<(String, HeaderValue)>,
}

/// A header field value.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Any non-object JSON value (string, number, bool, null, array).
    Scalar(Value),
    /// A nested header.
    Nested(Header),
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any existing field with the same key in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HeaderValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The `_summary` metadata string, if present.
    pub fn summary(&self) -> Option<&str> {
        match self.get(SUMMARY_KEY) {
            Some(HeaderValue::Scalar(Value::String(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Fields in their original order, metadata included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Whether a header key is metadata rather than a displayable field.
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with('_')
}

impl HeaderValue {
    /// Text shown for a scalar value; nested headers render as compact JSON.
    pub fn display_text(&self) -> String {
        match self {
            HeaderValue::Scalar(Value::String(s)) => s.clone(),
            HeaderValue::Scalar(Value::Null) => String::new(),
            HeaderValue::Scalar(other) => other.to_string(),
            HeaderValue::Nested(header) => Value::Object(header.clone().into()).to_string(),
        }
    }
}

impl From<Value> for HeaderValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => HeaderValue::Nested(Header::from(map)),
            other => HeaderValue::Scalar(other),
        }
    }
}

impl From<HeaderValue> for Value {
    fn from(value: HeaderValue) -> Self {
        match value {
            HeaderValue::Scalar(v) => v,
            HeaderValue::Nested(header) => Value::Object(header.into()),
        }
    }
}

impl From<Header> for HeaderValue {
    fn from(header: Header) -> Self {
        HeaderValue::Nested(header)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Scalar(Value::String(value.to_string()))
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Scalar(Value::String(value))
    }
}

impl From<i32> for HeaderValue {
    fn from(value: i32) -> Self {
        HeaderValue::Scalar(Value::from(value))
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Scalar(Value::from(value))
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        HeaderValue::Scalar(Value::from(value))
    }
}

impl From<Map<String, Value>> for Header {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, HeaderValue::from(v)))
                .collect(),
        }
    }
}

impl From<Header> for Map<String, Value> {
    fn from(header: Header) -> Self {
        header
            .fields
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()
    }
}
