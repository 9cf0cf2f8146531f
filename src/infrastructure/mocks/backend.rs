//! Recording save backend for tests.

use crate::application::ports::{BackendError, SaveBackend};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// One `save_batch` invocation seen by a [`MockBackend`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SaveCall<T> {
    /// Items in the sub-batch, in submission order
    pub items: Vec<T>,
    /// When the request started, on the Tokio clock
    pub started_at: Instant,
}

struct Inner<T> {
    calls: Vec<SaveCall<T>>,
    failures: HashMap<usize, BackendError>,
}

/// Backend that records every save request.
///
/// Clones share the same recording, so a test can keep one handle while the
/// scheduler owns another. Timestamps come from the Tokio clock and work
/// with paused time.
pub struct MockBackend<T> {
    inner: Arc<Mutex<Inner<T>>>,
    latency: Duration,
}

impl<T> Clone for MockBackend<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            latency: self.latency,
        }
    }
}

impl<T> MockBackend<T>
where
    T: Clone,
{
    /// Create a backend that accepts every request immediately.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                calls: Vec::new(),
                failures: HashMap::new(),
            })),
            latency: Duration::ZERO,
        }
    }

    /// Delay every request by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail the `call`-th request (1-based) with `err`.
    pub fn fail_on_call(self, call: usize, err: BackendError) -> Self {
        self.lock().failures.insert(call, err);
        self
    }

    /// Every request seen so far, in the order they started.
    pub fn calls(&self) -> Vec<SaveCall<T>> {
        self.lock().calls.clone()
    }

    /// Items across every request, in the order they were received.
    pub fn saved_items(&self) -> Vec<T> {
        self.lock()
            .calls
            .iter()
            .flat_map(|call| call.items.iter().cloned())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner
            .lock()
            .expect("MockBackend mutex poisoned - a test thread panicked while holding the lock")
    }
}

impl<T> Default for MockBackend<T>
where
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> SaveBackend<T> for MockBackend<T>
where
    T: Clone + Send + 'static,
{
    async fn save_batch(&self, items: Vec<T>) -> Result<(), BackendError> {
        let outcome = {
            let mut inner = self.lock();
            inner.calls.push(SaveCall {
                items,
                started_at: Instant::now(),
            });
            let call = inner.calls.len();
            inner.failures.remove(&call)
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match outcome {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
