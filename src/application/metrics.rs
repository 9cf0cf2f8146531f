//! Observability metrics for the scheduler.
//!
//! Counters describing how much work was queued, paced, saved and discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking scheduler activity.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Items accepted by enqueue calls
    items_enqueued: AtomicU64,
    /// Pacing ticks that released a slice
    ticks: AtomicU64,
    /// Sub-batches saved successfully
    batches_saved: AtomicU64,
    /// Items saved successfully
    items_saved: AtomicU64,
    /// Sub-batches the backend failed
    batches_failed: AtomicU64,
    /// Queued items dropped by a halt
    items_discarded: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_enqueued(&self, count: usize) {
        self.inner
            .items_enqueued
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_tick(&self) {
        self.inner.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_batch_saved(&self, items: usize) {
        self.inner.batches_saved.fetch_add(1, Ordering::Relaxed);
        self.inner
            .items_saved
            .fetch_add(items as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_batch_failed(&self) {
        self.inner.batches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self, count: usize) {
        self.inner
            .items_discarded
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Items accepted by enqueue calls.
    pub fn items_enqueued(&self) -> u64 {
        self.inner.items_enqueued.load(Ordering::Relaxed)
    }

    /// Pacing ticks that released a slice.
    pub fn ticks(&self) -> u64 {
        self.inner.ticks.load(Ordering::Relaxed)
    }

    /// Sub-batches saved successfully.
    pub fn batches_saved(&self) -> u64 {
        self.inner.batches_saved.load(Ordering::Relaxed)
    }

    /// Items saved successfully.
    pub fn items_saved(&self) -> u64 {
        self.inner.items_saved.load(Ordering::Relaxed)
    }

    /// Sub-batches the backend failed.
    pub fn batches_failed(&self) -> u64 {
        self.inner.batches_failed.load(Ordering::Relaxed)
    }

    /// Queued items dropped by a halt.
    pub fn items_discarded(&self) -> u64 {
        self.inner.items_discarded.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_enqueued: self.items_enqueued(),
            ticks: self.ticks(),
            batches_saved: self.batches_saved(),
            items_saved: self.items_saved(),
            batches_failed: self.batches_failed(),
            items_discarded: self.items_discarded(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Items accepted by enqueue calls
    pub items_enqueued: u64,
    /// Pacing ticks that released a slice
    pub ticks: u64,
    /// Sub-batches saved successfully
    pub batches_saved: u64,
    /// Items saved successfully
    pub items_saved: u64,
    /// Sub-batches the backend failed
    pub batches_failed: u64,
    /// Queued items dropped by a halt
    pub items_discarded: u64,
}

impl MetricsSnapshot {
    /// Items that were neither saved nor discarded yet.
    ///
    /// Covers queued items and items inside in-flight or failed requests.
    pub fn items_outstanding(&self) -> u64 {
        self.items_enqueued
            .saturating_sub(self.items_saved)
            .saturating_sub(self.items_discarded)
    }
}
