//! Closure-backed save backend.

use crate::application::ports::{BackendError, SaveBackend};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

/// Adapts an async closure into a [`SaveBackend`].
///
/// ```
/// use save_throttle::{BackendError, FnBackend, SaveBackend};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = FnBackend::new(|batch: Vec<String>| async move {
///     if batch.iter().any(|s| s.is_empty()) {
///         return Err(BackendError::with_code(142, "empty value"));
///     }
///     Ok(())
/// });
///
/// assert!(backend.save_batch(vec!["a".to_string()]).await.is_ok());
/// assert!(backend.save_batch(vec![String::new()]).await.is_err());
/// # }
/// ```
pub struct FnBackend<F, T> {
    save: F,
    _items: PhantomData<fn(Vec<T>)>,
}

impl<F, T> FnBackend<F, T> {
    pub fn new(save: F) -> Self {
        Self {
            save,
            _items: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, T> SaveBackend<T> for FnBackend<F, T>
where
    F: Fn(Vec<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BackendError>> + Send + 'static,
    T: Send + 'static,
{
    async fn save_batch(&self, items: Vec<T>) -> Result<(), BackendError> {
        (self.save)(items).await
    }
}

impl<F, T> fmt::Debug for FnBackend<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBackend").finish_non_exhaustive()
    }
}
