//! Incremental filtering against the mock evaluator.
//!
//! The mask built batch by batch must equal the mask from evaluating the
//! whole corpus at once, whatever the batch boundaries.

mod common;

use common::*;
use sniffer::filter::{evaluate, FilterEngine, FilterStatus, MAX_SLICE_ATTEMPTS};
use sniffer::models::Record;
use sniffer::store::StreamStore;
use sniffer::traits::EvaluationError;

async fn full_recompute(records: &[Record], predicate: &str) -> Vec<bool> {
    evaluate(&mock_evaluator(), records, predicate).await.unwrap()
}

#[tokio::test]
async fn test_incremental_mask_matches_full_recompute() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();

    store.ingest(batch(1..8));
    let request = engine.set_predicate(HTTPS_PREDICATE, store.records()).unwrap();
    assert!(engine.apply_outcome(request.run(&evaluator).await));

    for range in [8..9, 9..40, 40..41, 41..100] {
        store.ingest(batch(range));
        let request = engine.on_ingest(store.records()).unwrap();
        assert!(engine.apply_outcome(request.run(&evaluator).await));
    }

    let expected = full_recompute(store.records(), HTTPS_PREDICATE).await;
    assert_eq!(engine.current_mask(store.len()), Some(expected.as_slice()));
    assert_eq!(
        engine.status(store.len()),
        FilterStatus::Applied {
            matched: expected.iter().filter(|&&m| m).count()
        }
    );
}

#[tokio::test]
async fn test_batches_arriving_while_full_evaluation_in_flight() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();

    store.ingest(batch(1..5));
    let full = engine.set_predicate(ODD_PREDICATE, store.records()).unwrap();

    // Two batches land before the full evaluation completes
    store.ingest(batch(5..7));
    let first_slice = engine.on_ingest(store.records()).unwrap();
    store.ingest(batch(7..10));
    let second_slice = engine.on_ingest(store.records()).unwrap();
    assert_eq!(first_slice.start, 4);
    assert_eq!(second_slice.start, 6);

    // The mask lags until the full result arrives
    assert_eq!(engine.status(store.len()), FilterStatus::Pending);

    for request in [full, first_slice, second_slice] {
        assert!(engine.apply_outcome(request.run(&evaluator).await));
    }

    let expected = full_recompute(store.records(), ODD_PREDICATE).await;
    assert_eq!(engine.current_mask(store.len()), Some(expected.as_slice()));
}

#[tokio::test]
async fn test_superseded_predicate_results_are_ignored() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();
    store.ingest(batch(1..11));

    let old = engine.set_predicate(TCP_PREDICATE, store.records()).unwrap();
    let new = engine.set_predicate(ODD_PREDICATE, store.records()).unwrap();

    // Completes after the newer one
    assert!(engine.apply_outcome(new.run(&evaluator).await));
    assert!(!engine.apply_outcome(old.run(&evaluator).await));

    let expected = full_recompute(store.records(), ODD_PREDICATE).await;
    assert_eq!(engine.current_mask(store.len()), Some(expected.as_slice()));
}

#[tokio::test]
async fn test_failed_predicate_keeps_previous_mask() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();
    store.ingest(batch(1..6));

    let request = engine.set_predicate(TCP_PREDICATE, store.records()).unwrap();
    engine.apply_outcome(request.run(&evaluator).await);
    let tcp_mask = engine.current_mask(store.len()).unwrap().to_vec();

    // Unknown to the mock, so it fails like a jq compile error
    let request = engine.set_predicate(".type ==", store.records()).unwrap();
    engine.apply_outcome(request.run(&evaluator).await);

    assert!(matches!(
        engine.status(store.len()),
        FilterStatus::Failed { .. }
    ));
    assert_eq!(engine.current_mask(store.len()), Some(tcp_mask.as_slice()));

    // No incremental work for a failed predicate
    store.ingest(batch(6..8));
    assert!(engine.on_ingest(store.records()).is_none());
}

#[tokio::test]
async fn test_failed_slice_is_requested_again() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();
    store.ingest(batch(1..4));

    let request = engine.set_predicate(ODD_PREDICATE, store.records()).unwrap();
    engine.apply_outcome(request.run(&evaluator).await);

    store.ingest(batch(4..6));
    let slice = engine.on_ingest(store.records()).unwrap();
    evaluator
        .set_failure(Some(EvaluationError::Timeout { millis: 10 }))
        .await;
    assert!(!engine.apply_outcome(slice.run(&evaluator).await));
    evaluator.set_failure(None).await;

    store.ingest(batch(6..7));
    let retry = engine.on_ingest(store.records()).unwrap();
    assert_eq!(retry.start, 3);
    assert_eq!(retry.records.len(), 3);
    assert!(engine.apply_outcome(retry.run(&evaluator).await));

    let expected = full_recompute(store.records(), ODD_PREDICATE).await;
    assert_eq!(engine.current_mask(store.len()), Some(expected.as_slice()));
}

#[tokio::test]
async fn test_runtime_error_on_new_records_fails_filter() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();
    store.ingest(batch(1..4));

    let request = engine.set_predicate(ODD_PREDICATE, store.records()).unwrap();
    assert!(engine.apply_outcome(request.run(&evaluator).await));

    // Like `.info | test("GET")` meeting a record without info
    evaluator
        .set_failure(Some(EvaluationError::Failed {
            message: "jq: error: null (null) cannot be matched".to_string(),
        }))
        .await;

    let mut slice_sizes = Vec::new();
    for round in 0..5 {
        let start = 4 + round * 10;
        store.ingest(batch(start..start + 10));
        if let Some(slice) = engine.on_ingest(store.records()) {
            slice_sizes.push(slice.records.len());
            engine.apply_outcome(slice.run(&evaluator).await);
        }
    }

    assert_eq!(slice_sizes, vec![10]);
    match engine.status(store.len()) {
        FilterStatus::Failed { message } => assert!(message.contains("cannot be matched")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert_eq!(evaluator.call_count().await, 2);
}

#[tokio::test]
async fn test_slice_timeouts_give_up_after_limit() {
    let evaluator = mock_evaluator();
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();
    store.ingest(batch(1..4));

    let request = engine.set_predicate(ODD_PREDICATE, store.records()).unwrap();
    assert!(engine.apply_outcome(request.run(&evaluator).await));

    evaluator
        .set_failure(Some(EvaluationError::Timeout { millis: 10 }))
        .await;

    let mut slice_sizes = Vec::new();
    for round in 0..5 {
        let start = 4 + round * 10;
        store.ingest(batch(start..start + 10));
        if let Some(slice) = engine.on_ingest(store.records()) {
            slice_sizes.push(slice.records.len());
            engine.apply_outcome(slice.run(&evaluator).await);
        }
    }

    assert_eq!(slice_sizes.len(), MAX_SLICE_ATTEMPTS as usize);
    assert_eq!(slice_sizes, vec![10, 20, 30]);
    assert!(matches!(
        engine.status(store.len()),
        FilterStatus::Failed { .. }
    ));
}

#[tokio::test]
async fn test_wrong_length_output_is_rejected() {
    let evaluator = mock_evaluator();
    evaluator
        .set_output_override(Some(serde_json::json!([true])))
        .await;
    let mut store = StreamStore::new();
    let mut engine = FilterEngine::new();
    store.ingest(batch(1..4));

    let request = engine.set_predicate(TCP_PREDICATE, store.records()).unwrap();
    let outcome = request.run(&evaluator).await;
    assert!(matches!(
        outcome.result,
        Err(EvaluationError::InvalidOutput { .. })
    ));
    engine.apply_outcome(outcome);
    assert!(matches!(
        engine.status(store.len()),
        FilterStatus::Failed { .. }
    ));
}
