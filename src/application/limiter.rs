//! Rate-limited save scheduler.
//!
//! [`RateLimiter`] owns the queue, the pacer and the dispatcher. Callers
//! enqueue items, then call [`RateLimiter::finalize`] to start pacing and get
//! a single [`Completion`] for the whole run.
//!
//! All mutable state sits behind one mutex in a shared core. The pacer task,
//! dispatch watchers and the public methods each hold the lock only for short,
//! non-async sections, so the state has a single writer at any time.

use crate::application::completion::{
    completion_channel, Completion, CompletionRequest, FinalizeError,
};
use crate::application::config::{
    ConfigError, LimiterConfig, DEFAULT_INTERVAL, DEFAULT_MAX_BATCH_SIZE,
};
use crate::application::dispatcher::{Dispatcher, InFlight};
use crate::application::metrics::Metrics;
use crate::application::ports::{BackendError, SaveBackend};
use crate::application::queue::SaveQueue;
use crate::domain::item::{Item, ItemRejection};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

#[cfg(feature = "json")]
use crate::domain::record::{describe_value, json_type_name, Record};
#[cfg(feature = "json")]
use serde_json::Value;

/// Error returned when an enqueue call is refused.
///
/// The queue is never modified by a refused call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueError {
    /// An item does not satisfy the item contract
    InvalidItem {
        /// Position of the item in the submitted sequence, if any
        index: Option<usize>,
        /// Description of the offending value
        item: String,
        /// Why it was refused
        reason: ItemRejection,
    },
    /// A bulk enqueue was handed something other than a sequence
    InvalidInput {
        /// Kind of value received instead
        found: &'static str,
    },
    /// A save failed earlier; the scheduler accepts no more work
    Halted,
}

impl fmt::Display for EnqueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::InvalidItem {
                index: Some(index),
                item,
                reason,
            } => write!(f, "invalid item at index {} ({}): {}", index, item, reason),
            EnqueueError::InvalidItem {
                index: None,
                item,
                reason,
            } => write!(f, "invalid item {}: {}", item, reason),
            EnqueueError::InvalidInput { found } => {
                write!(f, "expected a sequence of items, found {}", found)
            }
            EnqueueError::Halted => write!(f, "scheduler halted after a failed save"),
        }
    }
}

impl std::error::Error for EnqueueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnqueueError::InvalidItem { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Mutable scheduler state.
pub(crate) struct State<T> {
    pub(crate) queue: SaveQueue<T>,
    /// Running pacer task, if any
    pub(crate) pacer: Option<JoinHandle<()>>,
    pub(crate) halted: bool,
    /// Error that halted the scheduler, reported by every later `finalize`
    pub(crate) stored_error: Option<BackendError>,
    pub(crate) completion: Option<CompletionRequest>,
    pub(crate) in_flight: InFlight,
    /// Number of slices dispatched so far
    pub(crate) dispatches: u64,
    /// When the most recent slice was released
    pub(crate) last_tick: Option<Instant>,
}

/// State shared between handles, the pacer and dispatch watchers.
pub(crate) struct Core<T> {
    state: Mutex<State<T>>,
    pub(crate) dispatcher: Dispatcher<T>,
    pub(crate) config: LimiterConfig,
    pub(crate) metrics: Metrics,
}

impl<T> Core<T>
where
    T: Item,
{
    pub(crate) fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop all further work after a failed save.
    ///
    /// Idempotent: only the first call has any effect.
    pub(crate) fn halt(&self, err: BackendError) {
        let mut state = self.lock();

        if state.halted {
            debug!(error = %err, "already halted, ignoring failure");
            return;
        }

        if let Some(pacer) = state.pacer.take() {
            pacer.abort();
        }
        state.halted = true;

        let discarded = state.queue.discard();
        self.metrics.record_discarded(discarded);
        warn!(error = %err, discarded, "save failed, halting scheduler");

        state.stored_error = Some(err.clone());
        if let Some(request) = state.completion.take() {
            request.reject(err);
        }
    }
}

/// Paces saves of `T` against a backend.
///
/// Cloning yields another handle to the same scheduler.
///
/// # Example
///
/// ```
/// use save_throttle::{BackendError, FnBackend, Item, RateLimiter};
/// use std::time::Duration;
///
/// struct Score(u32);
///
/// impl Item for Score {
///     fn kind(&self) -> &str {
///         "Score"
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = FnBackend::new(|batch: Vec<Score>| async move {
///     println!("saving {} scores", batch.len());
///     Ok::<_, BackendError>(())
/// });
///
/// let limiter = RateLimiter::builder()
///     .with_max_rate(100)
///     .with_interval(Duration::from_millis(10))
///     .build(backend)
///     .unwrap();
///
/// limiter.enqueue_all((0..250).map(Score)).unwrap();
/// limiter.finalize().await.unwrap();
/// assert_eq!(limiter.metrics().ticks(), 3);
/// # }
/// ```
pub struct RateLimiter<T>
where
    T: Item,
{
    core: Arc<Core<T>>,
}

impl<T> Clone for RateLimiter<T>
where
    T: Item,
{
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> RateLimiter<T>
where
    T: Item,
{
    /// Create a scheduler releasing `max_rate` items per second.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroMaxRate` if `max_rate` is zero.
    pub fn new<B>(max_rate: usize, backend: B) -> Result<Self, ConfigError>
    where
        B: SaveBackend<T> + 'static,
    {
        Self::with_config(LimiterConfig::new(max_rate)?, backend)
    }

    /// Create a scheduler from an explicit configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn with_config<B>(config: LimiterConfig, backend: B) -> Result<Self, ConfigError>
    where
        B: SaveBackend<T> + 'static,
    {
        let config = config.validate()?;
        let metrics = Metrics::new();
        let dispatcher =
            Dispatcher::new(Arc::new(backend), config.max_batch_size, metrics.clone());

        debug!(
            max_rate = config.max_rate,
            interval_ms = config.interval.as_millis() as u64,
            max_batch_size = config.max_batch_size,
            "rate limiter created"
        );

        Ok(Self {
            core: Arc::new(Core {
                state: Mutex::new(State {
                    queue: SaveQueue::new(),
                    pacer: None,
                    halted: false,
                    stored_error: None,
                    completion: None,
                    in_flight: InFlight::default(),
                    dispatches: 0,
                    last_tick: None,
                }),
                dispatcher,
                config,
                metrics,
            }),
        })
    }

    /// Start building a scheduler.
    pub fn builder() -> RateLimiterBuilder<T> {
        RateLimiterBuilder::new()
    }

    /// Append one item to the tail of the queue.
    ///
    /// Does not start pacing; see [`RateLimiter::finalize`].
    ///
    /// # Errors
    /// Returns `EnqueueError::InvalidItem` if the item fails validation, or
    /// `EnqueueError::Halted` once a save has failed.
    pub fn enqueue(&self, item: T) -> Result<(), EnqueueError> {
        item.validate().map_err(|reason| EnqueueError::InvalidItem {
            index: None,
            item: item.describe(),
            reason,
        })?;

        let mut state = self.core.lock();
        if state.halted {
            return Err(EnqueueError::Halted);
        }
        state.queue.push(item);
        self.core.metrics.record_enqueued(1);
        Ok(())
    }

    /// Append a sequence of items, all or nothing.
    ///
    /// Every item is validated before the queue is touched.
    ///
    /// # Errors
    /// Returns `EnqueueError::InvalidItem` naming the first invalid item, or
    /// `EnqueueError::Halted` once a save has failed.
    pub fn enqueue_all<I>(&self, items: I) -> Result<(), EnqueueError>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        for (index, item) in items.iter().enumerate() {
            item.validate().map_err(|reason| EnqueueError::InvalidItem {
                index: Some(index),
                item: item.describe(),
                reason,
            })?;
        }

        let mut state = self.core.lock();
        if state.halted {
            return Err(EnqueueError::Halted);
        }
        let added = items.len();
        state.queue.extend(items);
        self.core.metrics.record_enqueued(added);
        debug!(added, queued = state.queue.len(), "items enqueued");
        Ok(())
    }

    /// Start draining the queue and return a handle for the whole run.
    ///
    /// Returns immediately. The completion settles:
    /// - with the stored error, if a save failed before this call;
    /// - with `AlreadyFinalized`, if an earlier completion is still pending;
    /// - once the queue drains and every save succeeded, or with the first
    ///   save error, if items are queued;
    /// - once in-flight saves finish, if the queue is already empty.
    ///
    /// Pacing runs on the current Tokio runtime. Called outside one while
    /// items are queued, the completion fails with `NoRuntime` and the queue
    /// is left untouched.
    pub fn finalize(&self) -> Completion {
        let mut state = self.core.lock();

        if let Some(err) = state.stored_error.clone() {
            return Completion::failed(FinalizeError::Backend(err));
        }

        if state.completion.is_some() {
            return Completion::failed(FinalizeError::AlreadyFinalized);
        }

        if !state.queue.is_empty() {
            if tokio::runtime::Handle::try_current().is_err() {
                warn!(queued = state.queue.len(), "finalize called outside a Tokio runtime");
                return Completion::failed(FinalizeError::NoRuntime);
            }
            let (request, completion) = completion_channel();
            state.completion = Some(request);
            self.core.start_pacer_if_idle(&mut state);
            return completion;
        }

        if state.in_flight.is_empty() {
            return Completion::succeeded();
        }
        Completion::after(state.in_flight.joined())
    }

    /// Number of items waiting for a pacing tick.
    pub fn queue_len(&self) -> usize {
        self.core.lock().queue.len()
    }

    /// Whether a save failed and the scheduler stopped.
    pub fn is_halted(&self) -> bool {
        self.core.lock().halted
    }

    /// Whether a pacer task is currently scheduled.
    pub fn is_pacing(&self) -> bool {
        self.core.lock().pacer.is_some()
    }

    /// The validated configuration.
    pub fn config(&self) -> &LimiterConfig {
        &self.core.config
    }

    /// Activity counters.
    pub fn metrics(&self) -> &Metrics {
        &self.core.metrics
    }
}

#[cfg(feature = "json")]
impl RateLimiter<Record> {
    /// Enqueue a raw JSON value as a [`Record`].
    ///
    /// # Errors
    /// Returns `EnqueueError::InvalidItem` if the value is not a record
    /// object, or `EnqueueError::Halted` once a save has failed.
    pub fn enqueue_value(&self, value: Value) -> Result<(), EnqueueError> {
        let item = describe_value(&value);
        let record =
            Record::from_value(value).map_err(|reason| EnqueueError::InvalidItem {
                index: None,
                item,
                reason,
            })?;
        self.enqueue(record)
    }

    /// Enqueue a JSON array of records, all or nothing.
    ///
    /// # Errors
    /// Returns `EnqueueError::InvalidInput` if `value` is not an array,
    /// `EnqueueError::InvalidItem` naming the first element that is not a
    /// record object, or `EnqueueError::Halted` once a save has failed.
    pub fn enqueue_all_values(&self, value: Value) -> Result<(), EnqueueError> {
        let values = match value {
            Value::Array(values) => values,
            other => {
                return Err(EnqueueError::InvalidInput {
                    found: json_type_name(&other),
                })
            }
        };

        let mut records = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let item = describe_value(&value);
            let record =
                Record::from_value(value).map_err(|reason| EnqueueError::InvalidItem {
                    index: Some(index),
                    item,
                    reason,
                })?;
            records.push(record);
        }

        self.enqueue_all(records)
    }
}

impl<T> fmt::Debug for RateLimiter<T>
where
    T: Item,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.core.lock();
        f.debug_struct("RateLimiter")
            .field("config", &self.core.config)
            .field("queued", &state.queue.len())
            .field("pacing", &state.pacer.is_some())
            .field("halted", &state.halted)
            .finish()
    }
}

/// Builder for constructing a [`RateLimiter`].
///
/// The item type is carried from [`RateLimiter::builder`] through to
/// [`RateLimiterBuilder::build`], so it is usually inferred from the backend.
///
/// ```
/// use save_throttle::{BackendError, ConfigError, FnBackend, Item, RateLimiter};
/// use std::time::Duration;
///
/// struct Note(String);
///
/// impl Item for Note {
///     fn kind(&self) -> &str {
///         "Note"
///     }
/// }
///
/// let limiter = RateLimiter::builder()
///     .with_max_rate(5)
///     .with_interval(Duration::from_millis(200))
///     .build(FnBackend::new(|_: Vec<Note>| async { Ok::<_, BackendError>(()) }))
///     .unwrap();
/// assert_eq!(limiter.config().max_rate, 5);
/// limiter.enqueue(Note("hello".into())).unwrap();
///
/// let missing_rate = RateLimiter::builder()
///     .build(FnBackend::new(|_: Vec<Note>| async { Ok::<_, BackendError>(()) }));
/// assert!(matches!(missing_rate, Err(ConfigError::ZeroMaxRate)));
/// ```
pub struct RateLimiterBuilder<T> {
    max_rate: usize,
    interval: Duration,
    max_batch_size: usize,
    _items: PhantomData<fn() -> T>,
}

impl<T> RateLimiterBuilder<T>
where
    T: Item,
{
    fn new() -> Self {
        Self {
            max_rate: 0,
            interval: DEFAULT_INTERVAL,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            _items: PhantomData,
        }
    }

    /// Set how many items are released per interval. Required.
    pub fn with_max_rate(mut self, max_rate: usize) -> Self {
        self.max_rate = max_rate;
        self
    }

    /// Set the time between two pacing ticks.
    ///
    /// Default: 1 second
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the upper bound on items per save request.
    ///
    /// Default: 20
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Build the scheduler.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid, including when
    /// no max rate was set.
    pub fn build<B>(self, backend: B) -> Result<RateLimiter<T>, ConfigError>
    where
        B: SaveBackend<T> + 'static,
    {
        let config = LimiterConfig {
            max_rate: self.max_rate,
            interval: self.interval,
            max_batch_size: self.max_batch_size,
        };
        RateLimiter::with_config(config, backend)
    }
}

impl<T> Default for RateLimiterBuilder<T>
where
    T: Item,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RateLimiterBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            max_rate: self.max_rate,
            interval: self.interval,
            max_batch_size: self.max_batch_size,
            _items: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RateLimiterBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiterBuilder")
            .field("max_rate", &self.max_rate)
            .field("interval", &self.interval)
            .field("max_batch_size", &self.max_batch_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockBackend;

    #[derive(Debug, Clone, PartialEq)]
    struct Doc(&'static str);

    impl Item for Doc {
        fn kind(&self) -> &str {
            "Doc"
        }

        fn id(&self) -> Option<&str> {
            Some(self.0)
        }

        fn validate(&self) -> Result<(), ItemRejection> {
            if self.0.is_empty() {
                return Err(ItemRejection::new("empty id"));
            }
            Ok(())
        }
    }

    fn limiter(max_rate: usize, backend: &MockBackend<Doc>) -> RateLimiter<Doc> {
        RateLimiter::new(max_rate, backend.clone()).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_rate() {
        let result = RateLimiter::new(0, MockBackend::<Doc>::new());
        assert!(matches!(result, Err(ConfigError::ZeroMaxRate)));
    }

    #[test]
    fn test_builder_requires_max_rate() {
        let result = RateLimiter::builder().build(MockBackend::<Doc>::new());
        assert!(matches!(result, Err(ConfigError::ZeroMaxRate)));
    }

    #[test]
    fn test_builder_settings() {
        let limiter = RateLimiter::builder()
            .with_max_rate(5)
            .with_interval(Duration::from_millis(250))
            .with_max_batch_size(2)
            .build(MockBackend::<Doc>::new())
            .unwrap();

        assert_eq!(limiter.config().max_rate, 5);
        assert_eq!(limiter.config().interval, Duration::from_millis(250));
        assert_eq!(limiter.config().max_batch_size, 2);
    }

    #[test]
    fn test_builder_item_type_follows_backend() {
        let backend = MockBackend::new();
        let limiter = RateLimiter::builder()
            .with_max_rate(1)
            .build(backend.clone())
            .unwrap();

        limiter.enqueue(Doc("a")).unwrap();
        assert_eq!(limiter.queue_len(), 1);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_finalize_outside_runtime_fails_without_losing_items() {
        let backend = MockBackend::new();
        let limiter = limiter(2, &backend);
        limiter.enqueue_all([Doc("a"), Doc("b")]).unwrap();

        let outcome = futures::executor::block_on(limiter.finalize());

        assert_eq!(outcome, Err(FinalizeError::NoRuntime));
        assert_eq!(limiter.queue_len(), 2);
        assert!(!limiter.is_pacing());
        assert!(!limiter.is_halted());
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_finalize_outside_runtime_with_empty_queue_succeeds() {
        let backend = MockBackend::new();
        let limiter = limiter(2, &backend);

        let outcome = futures::executor::block_on(limiter.finalize());
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn test_enqueue_does_not_start_pacing() {
        let backend = MockBackend::new();
        let limiter = limiter(2, &backend);

        limiter.enqueue(Doc("a")).unwrap();
        limiter.enqueue_all(vec![Doc("b"), Doc("c")]).unwrap();

        assert_eq!(limiter.queue_len(), 3);
        assert!(!limiter.is_pacing());
        assert_eq!(limiter.metrics().items_enqueued(), 3);
    }

    #[test]
    fn test_enqueue_rejects_invalid_item() {
        let limiter = limiter(2, &MockBackend::new());

        let err = limiter.enqueue(Doc("")).unwrap_err();
        assert_eq!(
            err,
            EnqueueError::InvalidItem {
                index: None,
                item: "Doc()".to_string(),
                reason: ItemRejection::new("empty id"),
            }
        );
        assert_eq!(limiter.queue_len(), 0);
    }

    #[test]
    fn test_enqueue_all_is_all_or_nothing() {
        let limiter = limiter(2, &MockBackend::new());
        limiter.enqueue(Doc("first")).unwrap();

        let err = limiter
            .enqueue_all(vec![Doc("a"), Doc(""), Doc("b")])
            .unwrap_err();

        assert!(matches!(err, EnqueueError::InvalidItem { index: Some(1), .. }));
        assert_eq!(limiter.queue_len(), 1);
        assert_eq!(limiter.metrics().items_enqueued(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalize_with_nothing_queued_succeeds() {
        let backend = MockBackend::new();
        let limiter = limiter(2, &backend);

        assert_eq!(limiter.finalize().await, Ok(()));
        assert!(!limiter.is_pacing());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalize_drains_queue() {
        let backend = MockBackend::new();
        let limiter = limiter(2, &backend);
        limiter
            .enqueue_all(vec![Doc("a"), Doc("b"), Doc("c")])
            .unwrap();

        let completion = limiter.finalize();
        assert!(limiter.is_pacing());
        completion.await.unwrap();

        assert_eq!(limiter.queue_len(), 0);
        assert!(!limiter.is_pacing());
        assert_eq!(backend.saved_items(), vec![Doc("a"), Doc("b"), Doc("c")]);
        assert_eq!(limiter.metrics().ticks(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_finalize_while_pending_is_rejected() {
        let backend = MockBackend::new();
        let limiter = limiter(1, &backend);
        limiter.enqueue_all(vec![Doc("a"), Doc("b")]).unwrap();

        let first = limiter.finalize();
        let second = limiter.finalize();

        assert_eq!(second.await, Err(FinalizeError::AlreadyFinalized));
        assert_eq!(first.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_is_idempotent() {
        let backend = MockBackend::new();
        let limiter = limiter(1, &backend);
        limiter.enqueue_all(vec![Doc("a"), Doc("b")]).unwrap();

        limiter.core.halt(BackendError::new("first"));
        limiter.core.halt(BackendError::new("second"));

        assert!(limiter.is_halted());
        assert_eq!(limiter.queue_len(), 0);
        assert_eq!(limiter.metrics().items_discarded(), 2);
        assert_eq!(
            limiter.finalize().await,
            Err(FinalizeError::Backend(BackendError::new("first")))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_after_halt_fails() {
        let limiter = limiter(1, &MockBackend::new());
        limiter.core.halt(BackendError::new("down"));

        assert_eq!(limiter.enqueue(Doc("a")), Err(EnqueueError::Halted));
        assert_eq!(limiter.enqueue_all(vec![Doc("b")]), Err(EnqueueError::Halted));
        assert_eq!(limiter.queue_len(), 0);
    }

    #[test]
    fn test_enqueue_error_display() {
        let err = EnqueueError::InvalidItem {
            index: Some(1),
            item: "\"not-an-item\"".to_string(),
            reason: ItemRejection::new("expected a JSON object, found string"),
        };
        assert_eq!(
            err.to_string(),
            "invalid item at index 1 (\"not-an-item\"): expected a JSON object, found string"
        );
        assert_eq!(
            EnqueueError::InvalidInput { found: "object" }.to_string(),
            "expected a sequence of items, found object"
        );
    }

    #[cfg(feature = "json")]
    mod json {
        use super::*;
        use serde_json::json;

        #[test]
        fn test_enqueue_all_values_names_offending_element() {
            let limiter = RateLimiter::new(10, MockBackend::<Record>::new()).unwrap();
            limiter
                .enqueue_value(json!({"className": "Score", "points": 1}))
                .unwrap();

            let err = limiter
                .enqueue_all_values(json!([
                    {"className": "Score", "points": 2},
                    "not-an-item",
                    {"className": "Score", "points": 3},
                ]))
                .unwrap_err();

            match err {
                EnqueueError::InvalidItem { index, item, .. } => {
                    assert_eq!(index, Some(1));
                    assert_eq!(item, "\"not-an-item\"");
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(limiter.queue_len(), 1);
        }

        #[test]
        fn test_enqueue_all_values_rejects_non_array() {
            let limiter = RateLimiter::new(10, MockBackend::<Record>::new()).unwrap();

            let err = limiter
                .enqueue_all_values(json!({"className": "Score"}))
                .unwrap_err();

            assert_eq!(err, EnqueueError::InvalidInput { found: "object" });
            assert_eq!(limiter.queue_len(), 0);
        }

        #[test]
        fn test_enqueue_value_rejects_non_record() {
            let limiter = RateLimiter::new(10, MockBackend::<Record>::new()).unwrap();
            let err = limiter.enqueue_value(json!(42)).unwrap_err();
            assert!(matches!(err, EnqueueError::InvalidItem { index: None, .. }));
        }
    }
}
