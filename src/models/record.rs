use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::header::Header;
use super::{deserialize_nullable_text, deserialize_payload};

/// Summary metadata for one captured packet. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Upstream-assigned, increasing identifier
    pub id: u64,
    /// Capture time as sent by the sniffer (number or string)
    #[serde(default)]
    pub timestamp: Value,
    /// Protocol of the outermost decoded layer ("TCP", "HTTP", ...)
    #[serde(
        rename = "type",
        alias = "name",
        default,
        deserialize_with = "deserialize_nullable_text"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub info: Option<String>,
    /// Decoded headers, outermost layer first
    #[serde(default)]
    pub headers: Vec<Header>,
}

/// A record as delivered by the feed, with its raw bytes embedded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub raw: Vec<u8>,
}

/// One feed message: a batch of records in arrival order.
pub type PacketBatch = Vec<RawRecord>;

impl Record {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            timestamp: Value::Null,
            kind: None,
            source: None,
            destination: None,
            info: None,
            headers: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_endpoints(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self.destination = Some(destination.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    /// Timestamp rendered for display (strings verbatim, null as empty).
    pub fn timestamp_text(&self) -> String {
        match &self.timestamp {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl RawRecord {
    pub fn new(record: Record, raw: Vec<u8>) -> Self {
        Self { record, raw }
    }

    /// Split into the stored record and its payload.
    pub fn into_parts(self) -> (Record, Vec<u8>) {
        (self.record, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_raw_record() {
        let json = r#"{
            "id": 7,
            "timestamp": 1528300000.25,
            "type": "TCP",
            "source": "10.0.0.1:443",
            "destination": "10.0.0.2:51000",
            "info": null,
            "body": "ignored",
            "headers": [
                {"_summary": "Ethernet II", "protocol": 8},
                {"_summary": "TCP", "flags": 18}
            ],
            "raw": [72, 105]
        }"#;

        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.record.id, 7);
        assert_eq!(raw.record.kind.as_deref(), Some("TCP"));
        assert_eq!(raw.record.source.as_deref(), Some("10.0.0.1:443"));
        assert_eq!(raw.record.info, None);
        assert_eq!(raw.record.headers.len(), 2);
        assert_eq!(raw.record.headers[0].summary(), Some("Ethernet II"));
        assert_eq!(raw.raw, vec![72, 105]);
    }

    #[test]
    fn test_name_alias_for_type() {
        let raw: RawRecord = serde_json::from_str(r#"{"id": 1, "name": "ARP"}"#).unwrap();
        assert_eq!(raw.record.kind.as_deref(), Some("ARP"));
    }

    #[test]
    fn test_minimal_record_defaults() {
        let raw: RawRecord = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(raw.record, Record::new(1));
        assert!(raw.raw.is_empty());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_str::<RawRecord>(r#"{"type": "TCP"}"#).is_err());
    }

    #[test]
    fn test_batch_deserialize() {
        let batch: PacketBatch =
            serde_json::from_str(r#"[{"id": 1, "raw": [1]}, {"id": 2, "raw": [2, 3]}]"#).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].raw, vec![2, 3]);
    }

    #[test]
    fn test_record_serializes_without_raw() {
        let record = Record::new(3)
            .with_kind("UDP")
            .with_endpoints("a", "b")
            .with_header(Header::new().with("port", 53));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["type"], "UDP");
        assert_eq!(value["headers"][0]["port"], 53);
        assert!(value.get("raw").is_none());
    }

    #[test]
    fn test_timestamp_text() {
        let mut record = Record::new(1);
        assert_eq!(record.timestamp_text(), "");
        record.timestamp = json!("12:00:01.5");
        assert_eq!(record.timestamp_text(), "12:00:01.5");
        record.timestamp = json!(12.5);
        assert_eq!(record.timestamp_text(), "12.5");
    }

    #[test]
    fn test_into_parts() {
        let raw = RawRecord::new(Record::new(9), vec![0xde, 0xad]);
        let (record, bytes) = raw.into_parts();
        assert_eq!(record.id, 9);
        assert_eq!(bytes, vec![0xde, 0xad]);
    }
}
