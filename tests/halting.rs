//! Integration tests for failure handling and the halted state.

mod common;

use common::{docs, limiter, numbered, Doc};
use save_throttle::infrastructure::mocks::MockBackend;
use save_throttle::{BackendError, EnqueueError, FinalizeError};
use std::time::Duration;
use tokio::time::sleep;

fn e1() -> BackendError {
    BackendError::with_code(155, "request limit exceeded")
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_rejects_completion_and_halts() {
    let backend = MockBackend::new().fail_on_call(1, e1());
    let limiter = limiter(10, 20, &backend);
    limiter.enqueue_all(docs(&["A", "B", "C"])).unwrap();

    let err = limiter.finalize().await.unwrap_err();
    assert_eq!(err, FinalizeError::Backend(e1()));
    assert_eq!(err.backend_error().and_then(|e| e.code()), Some(155));
    assert!(limiter.is_halted());

    assert_eq!(limiter.enqueue(Doc::new("D")), Err(EnqueueError::Halted));

    // The same error is reported to every later caller
    assert_eq!(limiter.finalize().await, Err(FinalizeError::Backend(e1())));
    assert_eq!(limiter.finalize().await, Err(FinalizeError::Backend(e1())));
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_failure() {
    let backend = MockBackend::new().fail_on_call(1, e1());
    let limiter = limiter(1, 20, &backend);
    limiter.enqueue_all(docs(&["A", "B", "C"])).unwrap();

    assert!(limiter.finalize().await.is_err());
    sleep(Duration::from_secs(10)).await;

    assert_eq!(backend.call_count(), 1);
    assert_eq!(limiter.queue_len(), 0);
    assert!(!limiter.is_pacing());

    let snapshot = limiter.metrics().snapshot();
    assert_eq!(snapshot.ticks, 1);
    assert_eq!(snapshot.batches_failed, 1);
    assert_eq!(snapshot.items_discarded, 2);
}

#[tokio::test(start_paused = true)]
async fn test_failure_in_later_tick_discards_rest() {
    let backend = MockBackend::new().fail_on_call(2, e1());
    let limiter = limiter(2, 20, &backend);
    limiter.enqueue_all(numbered(7)).unwrap();

    let err = limiter.finalize().await.unwrap_err();
    assert_eq!(err.backend_error(), Some(&e1()));

    sleep(Duration::from_secs(5)).await;
    assert_eq!(backend.call_count(), 2);
    assert_eq!(limiter.metrics().items_saved(), 2);
    assert_eq!(limiter.metrics().items_discarded(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_one_failed_sub_batch_fails_the_run() {
    let backend = MockBackend::new().fail_on_call(2, e1());
    let limiter = limiter(6, 2, &backend);
    limiter.enqueue_all(numbered(6)).unwrap();

    let err = limiter.finalize().await.unwrap_err();
    assert_eq!(err, FinalizeError::Backend(e1()));

    // Siblings of the failed request still ran
    sleep(Duration::from_millis(10)).await;
    assert_eq!(backend.call_count(), 3);
    assert_eq!(limiter.metrics().batches_saved(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_reported_after_unobserved_run() {
    let backend = MockBackend::new().fail_on_call(1, e1());
    let limiter = limiter(2, 20, &backend);
    limiter.enqueue_all(docs(&["A", "B", "C"])).unwrap();

    // First run ends early; its completion is dropped unobserved
    drop(limiter.finalize());
    sleep(Duration::from_secs(2)).await;
    assert!(limiter.is_halted());

    assert_eq!(limiter.finalize().await, Err(FinalizeError::Backend(e1())));
}

#[tokio::test(start_paused = true)]
async fn test_halted_enqueue_all_leaves_queue_empty() {
    let backend = MockBackend::new().fail_on_call(1, e1());
    let limiter = limiter(5, 20, &backend);
    limiter.enqueue(Doc::new("A")).unwrap();
    assert!(limiter.finalize().await.is_err());

    assert_eq!(
        limiter.enqueue_all(docs(&["B", "C"])),
        Err(EnqueueError::Halted)
    );
    assert_eq!(limiter.queue_len(), 0);
    assert_eq!(limiter.metrics().items_enqueued(), 1);
}
