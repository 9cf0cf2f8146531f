//! Completion signalling for a whole run.
//!
//! `finalize` hands the caller a [`Completion`], a future that settles once
//! every queued item has been saved or the run has halted. The scheduler
//! keeps the matching [`CompletionRequest`] and fulfils it exactly once.

use crate::application::ports::BackendError;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Error settling a [`Completion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeError {
    /// A save request failed and the scheduler halted
    Backend(BackendError),
    /// `finalize` was called while an earlier completion was still pending
    AlreadyFinalized,
    /// The scheduler was dropped before the run settled
    Abandoned,
    /// Items were queued but no Tokio runtime was available to pace them
    NoRuntime,
}

impl FinalizeError {
    /// The backend error that ended the run, if any.
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            FinalizeError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizeError::Backend(err) => write!(f, "run halted: {}", err),
            FinalizeError::AlreadyFinalized => {
                write!(f, "finalize called while a completion is already pending")
            }
            FinalizeError::Abandoned => write!(f, "scheduler dropped before the run settled"),
            FinalizeError::NoRuntime => write!(f, "finalize requires a Tokio runtime"),
        }
    }
}

impl std::error::Error for FinalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FinalizeError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for FinalizeError {
    fn from(err: BackendError) -> Self {
        FinalizeError::Backend(err)
    }
}

/// The scheduler's half of a pending completion.
#[derive(Debug)]
pub(crate) struct CompletionRequest {
    sender: oneshot::Sender<Result<(), BackendError>>,
}

impl CompletionRequest {
    /// Settle successfully. A caller that dropped its `Completion` is ignored.
    pub(crate) fn resolve(self) {
        let _ = self.sender.send(Ok(()));
    }

    /// Settle with the error that halted the run.
    pub(crate) fn reject(self, err: BackendError) {
        let _ = self.sender.send(Err(err));
    }
}

/// Create a pending completion and the request that settles it.
pub(crate) fn completion_channel() -> (CompletionRequest, Completion) {
    let (sender, receiver) = oneshot::channel();
    let completion = Completion::from_future(async move {
        match receiver.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(FinalizeError::Backend(err)),
            Err(_) => Err(FinalizeError::Abandoned),
        }
    });
    (CompletionRequest { sender }, completion)
}

/// Future returned by `RateLimiter::finalize`.
///
/// Resolves to `Ok(())` once every queued item was saved, or to the error
/// that ended the run. It does not need to be polled for the run to make
/// progress.
#[must_use = "a Completion does nothing unless awaited; dropping it only discards the result"]
pub struct Completion {
    inner: BoxFuture<'static, Result<(), FinalizeError>>,
}

impl Completion {
    fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), FinalizeError>> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// A completion that is already successful.
    pub(crate) fn succeeded() -> Self {
        Self::from_future(futures::future::ready(Ok(())))
    }

    /// A completion that has already failed.
    pub(crate) fn failed(err: FinalizeError) -> Self {
        Self::from_future(futures::future::ready(Err(err)))
    }

    /// A completion settling with the outcome of in-flight dispatches.
    pub(crate) fn after(outcome: BoxFuture<'static, Result<(), BackendError>>) -> Self {
        Self::from_future(outcome.map(|result| result.map_err(FinalizeError::Backend)))
    }
}

impl Future for Completion {
    type Output = Result<(), FinalizeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}
