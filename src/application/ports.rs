//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Failure reported by the persistence backend for one save request.
///
/// Cloneable so that the same error can be handed to every caller that asks
/// for the outcome of a halted run.
#[derive(Debug, Clone)]
pub struct BackendError {
    code: Option<i64>,
    message: String,
    source: Option<Arc<dyn Error + Send + Sync + 'static>>,
}

impl BackendError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error carrying a backend-specific status code.
    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying transport or client error.
    pub fn from_source<E>(source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            code: None,
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// Backend status code, if one was reported.
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "backend error {}: {}", code, self.message),
            None => write!(f, "backend error: {}", self.message),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

impl PartialEq for BackendError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message
    }
}

impl Eq for BackendError {}

/// Port for the remote persistence capability.
///
/// One call saves one sub-batch. Implementations must tolerate concurrent
/// calls; no atomicity across calls is assumed. Infrastructure provides
/// `FnBackend` for closures and `MockBackend` for tests.
#[async_trait]
pub trait SaveBackend<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Save every item of `items`, in order.
    ///
    /// # Errors
    /// Returns `BackendError` if the backend refuses or fails the request.
    async fn save_batch(&self, items: Vec<T>) -> Result<(), BackendError>;
}

#[async_trait]
impl<T, B> SaveBackend<T> for Arc<B>
where
    T: Send + 'static,
    B: SaveBackend<T> + ?Sized,
{
    async fn save_batch(&self, items: Vec<T>) -> Result<(), BackendError> {
        (**self).save_batch(items).await
    }
}
