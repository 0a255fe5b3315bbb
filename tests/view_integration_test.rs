//! ViewController behaviour over a long-running stream.

mod common;

use common::*;
use sniffer::error::{FilterError, LookupError};
use sniffer::filter::FilterStatus;
use sniffer::store::DISPLAY_WINDOW;
use sniffer::view::{EvaluatorState, ViewController};

#[tokio::test]
async fn test_visible_window_is_last_k_of_filtered_corpus() {
    let evaluator = mock_evaluator();
    let mut view = ready_view();

    for start in (1..2501).step_by(100) {
        let request = view.ingest(batch(start..start + 100));
        settle(&mut view, &evaluator, request).await;
    }
    assert_eq!(view.store().len(), 2500);

    let visible = view.visible_records();
    assert_eq!(visible.len(), DISPLAY_WINDOW);
    assert_eq!(visible.first().unwrap().id, 1501);
    assert_eq!(visible.last().unwrap().id, 2500);

    let request = view.set_predicate(TCP_PREDICATE).unwrap();
    settle(&mut view, &evaluator, request).await;
    assert_eq!(view.matched_len(), 1250);

    let visible = view.visible_records();
    assert_eq!(visible.len(), DISPLAY_WINDOW);
    assert!(visible.iter().all(|r| r.kind.as_deref() == Some("TCP")));
    assert_eq!(visible.last().unwrap().id, 2500);
    assert_eq!(visible.first().unwrap().id, 502);

    // More traffic keeps the filtered window current
    let request = view.ingest(batch(2501..2503));
    settle(&mut view, &evaluator, request).await;
    assert_eq!(view.visible_records().last().unwrap().id, 2502);
}

#[tokio::test]
async fn test_clearing_filter_restores_unfiltered_view() {
    let evaluator = mock_evaluator();
    let mut view = ready_view();
    view.ingest(batch(1..11));

    let request = view.set_predicate(ODD_PREDICATE).unwrap();
    settle(&mut view, &evaluator, request).await;
    assert_eq!(view.visible_records().len(), 5);

    assert!(view.set_predicate("   ").unwrap().is_none());
    assert_eq!(view.filter_status(), FilterStatus::Unfiltered);
    assert_eq!(view.visible_records().len(), 10);
}

#[tokio::test]
async fn test_unsettled_filter_shows_superset() {
    let mut view = ready_view();
    view.ingest(batch(1..5));
    let _pending = view.set_predicate(TCP_PREDICATE).unwrap();

    assert_eq!(view.filter_status(), FilterStatus::Pending);
    assert_eq!(view.visible_records().len(), 4);
}

#[test]
fn test_predicate_refused_until_evaluator_ready() {
    let mut view = ViewController::new();
    assert!(matches!(
        view.set_predicate(TCP_PREDICATE),
        Err(FilterError::EvaluatorNotReady)
    ));

    view.set_evaluator_state(EvaluatorState::Unavailable("jq not found".into()));
    assert!(matches!(
        view.set_predicate(TCP_PREDICATE),
        Err(FilterError::EvaluatorUnavailable { .. })
    ));

    // Clearing is always allowed
    assert!(view.set_predicate("").unwrap().is_none());
}

#[test]
fn test_detail_lookup_by_id() {
    let mut view = ViewController::new();
    view.ingest(batch(100..200));
    view.ingest(batch(200..300));

    let (record, payload) = view.detail(250).unwrap();
    assert_eq!(record.id, 250);
    assert_eq!(payload, b"payload-250");
    assert_eq!(view.store().resolve_by_id(250), Ok(150));

    assert_eq!(view.detail(5).unwrap_err(), LookupError::NotFound { id: 5 });
}

#[test]
fn test_selection_survives_window_shift() {
    let mut view = ViewController::new();
    view.ingest(batch(1..11));
    view.toggle_selection(3);

    view.ingest(batch(11..(DISPLAY_WINDOW as u64 + 100)));
    // Scrolled out of the window, still resolvable
    assert!(!view.visible_records().iter().any(|r| r.id == 3));
    let (record, _) = view.selected_detail().unwrap();
    assert_eq!(record.id, 3);
}
