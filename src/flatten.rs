//! Flattening of nested headers into displayable key/value rows.

use crate::models::{is_metadata_key, Header, HeaderValue};

/// One displayable header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub key: String,
    pub value: String,
}

impl AttributeRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Flatten a header depth-first, pre-order.
///
/// Nested headers are spliced in at their position using their own key names
/// (no prefixing, so equal names at different depths are not disambiguated).
/// Metadata keys (leading `_`) are skipped at every depth.
pub fn flatten(header: &Header) -> Vec<AttributeRow> {
    let mut rows = Vec::new();
    flatten_into(header, &mut rows);
    rows
}

fn flatten_into(header: &Header, rows: &mut Vec<AttributeRow>) {
    for (key, value) in header.iter() {
        if is_metadata_key(key) {
            continue;
        }
        match value {
            HeaderValue::Nested(inner) => flatten_into(inner, rows),
            scalar => rows.push(AttributeRow::new(key, scalar.display_text())),
        }
    }
}
