//! Wire and storage types for captured packets.
//!
//! A [`RawRecord`] is what arrives on the feed: a packet summary plus its raw
//! bytes. The store splits it into a [`Record`] and a payload buffer.

mod header;
mod record;

pub use header::{is_metadata_key, Header, HeaderValue, SUMMARY_KEY};
pub use record::{PacketBatch, RawRecord, Record};

use serde::{Deserialize, Deserializer};

/// Helper to deserialize a raw payload as bytes.
///
/// Accepts an array of byte values, a string (its UTF-8 bytes are the payload,
/// which is what the sniffer emits when the bytes happen to decode as text),
/// or null.
pub(crate) fn deserialize_payload<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct PayloadVisitor;

    impl<'de> Visitor<'de> for PayloadVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of byte values, a string or null")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<u8>, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(byte) = seq.next_element::<u8>()? {
                bytes.push(byte);
            }
            Ok(bytes)
        }

        fn visit_str<E>(self, value: &str) -> Result<Vec<u8>, E>
        where
            E: de::Error,
        {
            Ok(value.as_bytes().to_vec())
        }

        fn visit_string<E>(self, value: String) -> Result<Vec<u8>, E>
        where
            E: de::Error,
        {
            Ok(value.into_bytes())
        }

        fn visit_unit<E>(self) -> Result<Vec<u8>, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Vec<u8>, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(PayloadVisitor)
}

/// Helper to deserialize nullable strings as `None`.
pub(crate) fn deserialize_nullable_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
