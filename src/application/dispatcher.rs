//! Sub-batch fan-out and join.
//!
//! The dispatcher turns one slice into backend-sized sub-batches, submits
//! them as independent concurrent save requests and joins them into a single
//! outcome. A failed sub-batch fails the joined outcome immediately; sibling
//! requests already on the wire are left to finish on their own since the
//! backend offers no way to cancel them.

use crate::application::metrics::Metrics;
use crate::application::ports::{BackendError, SaveBackend};
use crate::domain::batch::split_into_batches;
use crate::domain::item::Item;
use futures::future::{try_join_all, BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shareable outcome of one dispatch.
///
/// Cloned into the halt watcher and the in-flight set; every clone observes
/// the same result.
pub(crate) type DispatchOutcome = Shared<BoxFuture<'static, Result<(), BackendError>>>;

/// Splits slices into sub-batches and submits them to the backend.
pub(crate) struct Dispatcher<T> {
    backend: Arc<dyn SaveBackend<T>>,
    max_batch_size: usize,
    metrics: Metrics,
}

impl<T> Dispatcher<T>
where
    T: Item,
{
    pub(crate) fn new(
        backend: Arc<dyn SaveBackend<T>>,
        max_batch_size: usize,
        metrics: Metrics,
    ) -> Self {
        Self {
            backend,
            max_batch_size,
            metrics,
        }
    }

    /// Submit every sub-batch of `slice` and return their joined outcome.
    ///
    /// Requests are spawned before this returns, so they start even if the
    /// returned future is never polled.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn dispatch(&self, slice: Vec<T>) -> BoxFuture<'static, Result<(), BackendError>> {
        let batches = split_into_batches(slice, self.max_batch_size);
        let batch_count = batches.len();

        let requests: Vec<_> = batches
            .into_iter()
            .enumerate()
            .map(|(index, batch)| {
                let backend = Arc::clone(&self.backend);
                let metrics = self.metrics.clone();
                tokio::spawn(async move {
                    let size = batch.len();
                    debug!(batch = index, of = batch_count, size, "submitting sub-batch");
                    match backend.save_batch(batch).await {
                        Ok(()) => {
                            metrics.record_batch_saved(size);
                            Ok(())
                        }
                        Err(err) => {
                            metrics.record_batch_failed();
                            warn!(batch = index, size, error = %err, "sub-batch save failed");
                            Err(err)
                        }
                    }
                })
            })
            .collect();

        async move {
            let joined = requests.into_iter().map(|handle| {
                handle.map(|result| match result {
                    Ok(outcome) => outcome,
                    Err(join_err) => Err(BackendError::new(format!(
                        "save request aborted: {}",
                        join_err
                    ))),
                })
            });
            try_join_all(joined).await.map(|_| ())
        }
        .boxed()
    }
}

/// Outcomes of dispatches that have not yet been seen to succeed.
///
/// Successful outcomes are pruned whenever a new one is recorded, so the set
/// stays bounded by the number of dispatches actually in flight. Failed
/// outcomes are kept so late callers still observe the error.
#[derive(Default)]
pub(crate) struct InFlight {
    outcomes: Vec<DispatchOutcome>,
}

impl InFlight {
    pub(crate) fn record(&mut self, outcome: DispatchOutcome) {
        self.outcomes
            .retain(|outcome| !matches!(outcome.peek(), Some(Ok(()))));
        self.outcomes.push(outcome);
    }

    /// Future settling once every recorded dispatch has settled.
    ///
    /// Succeeds immediately when nothing was ever dispatched.
    pub(crate) fn joined(&self) -> BoxFuture<'static, Result<(), BackendError>> {
        let outcomes = self.outcomes.clone();
        async move { try_join_all(outcomes).await.map(|_| ()) }.boxed()
    }

    pub(crate) fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
