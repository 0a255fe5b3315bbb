//! Common fixtures for integration tests.
//!
//! Record builders, a mock evaluator with a few realistic predicates, and a
//! helper that runs an evaluation request synchronously against a view.

#![allow(dead_code)]

pub use sniffer::adapters::mock::{MockEvaluator, MockFeed};

use sniffer::filter::EvaluationRequest;
use sniffer::models::{Header, PacketBatch, RawRecord, Record};
use sniffer::view::{EvaluatorState, ViewController};

pub const TCP_PREDICATE: &str = r#".type == "TCP""#;
pub const ODD_PREDICATE: &str = ".id % 2 == 1";
pub const HTTPS_PREDICATE: &str = r#".headers | any(.dport == 443)"#;

/// Record with id, kind and a TCP-ish header stack.
pub fn packet(id: u64, kind: &str) -> RawRecord {
    let port = if id % 3 == 0 { 443 } else { 80 };
    let record = Record::new(id)
        .with_kind(kind)
        .with_endpoints(format!("10.0.0.{}", id % 250), "10.0.0.254")
        .with_info(format!("packet {}", id))
        .with_header(Header::new().with("_summary", "Ethernet II").with("type", 2048))
        .with_header(
            Header::new()
                .with("_summary", format!("{} {} -> {}", kind, id, port))
                .with("dport", port),
        );
    RawRecord::new(record, format!("payload-{}", id).into_bytes())
}

/// Alternating TCP/UDP records for ids in `range`.
pub fn batch(range: std::ops::Range<u64>) -> PacketBatch {
    range
        .map(|id| packet(id, if id % 2 == 0 { "TCP" } else { "UDP" }))
        .collect()
}

/// Mock evaluator that understands the predicates above.
pub fn mock_evaluator() -> MockEvaluator {
    MockEvaluator::new()
        .with_predicate(TCP_PREDICATE, |r| r["type"] == "TCP")
        .with_predicate(ODD_PREDICATE, |r| r["id"].as_u64().unwrap_or(0) % 2 == 1)
        .with_predicate(HTTPS_PREDICATE, |r| {
            r["headers"]
                .as_array()
                .map(|hs| hs.iter().any(|h| h["dport"] == 443))
                .unwrap_or(false)
        })
}

/// A view whose evaluator has been probed successfully.
pub fn ready_view() -> ViewController {
    let mut view = ViewController::new();
    view.set_evaluator_state(EvaluatorState::Ready);
    view
}

/// Run `request` to completion and apply it, like the worker would.
pub async fn settle(
    view: &mut ViewController,
    evaluator: &MockEvaluator,
    request: Option<EvaluationRequest>,
) -> bool {
    match request {
        Some(request) => {
            let outcome = request.run(evaluator).await;
            view.apply_evaluation(outcome)
        }
        None => false,
    }
}
