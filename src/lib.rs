//! # save-throttle
//!
//! Rate-limited, concurrently draining batch dispatch of save operations.
//!
//! Callers enqueue items that must be persisted through a backend with a
//! request-rate limit. Once [`RateLimiter::finalize`] is called, a timer
//! releases at most `max_rate` items per interval, splits each released slice
//! into sub-batches of at most `max_batch_size` items, and submits those
//! sub-batches concurrently. The first failed save halts the scheduler for
//! good: the queue is discarded and every waiter sees that same error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use save_throttle::{BackendError, FnBackend, Item, RateLimiter};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Score {
//!     player: String,
//!     points: u32,
//! }
//!
//! impl Item for Score {
//!     fn kind(&self) -> &str {
//!         "Score"
//!     }
//! }
//!
//! # async fn upload(_: Vec<Score>) -> Result<(), BackendError> { Ok(()) }
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // At most 30 items per second, at most 20 items per request
//!     let limiter = RateLimiter::builder()
//!         .with_max_rate(30)
//!         .with_interval(Duration::from_secs(1))
//!         .with_max_batch_size(20)
//!         .build(FnBackend::new(upload))?;
//!
//!     for points in 0..100 {
//!         limiter.enqueue(Score { player: "ana".into(), points })?;
//!     }
//!
//!     // Starts pacing and resolves once all 100 items are saved
//!     limiter.finalize().await?;
//!     Ok(())
//! }
//! ```
//!
//! Enqueueing works anywhere, but pacing runs on the current Tokio runtime
//! (the `rt` and `time` features). Calling `finalize` outside a runtime while
//! items are queued returns a completion that fails with
//! [`FinalizeError::NoRuntime`] and leaves the queue untouched.
//!
//! ## How Draining Works
//!
//! - **Enqueue** appends to a FIFO queue. It never starts the timer and never
//!   reorders or deduplicates items.
//! - **Finalize** starts the pacer if it is idle. The first tick fires
//!   immediately; later ticks follow every `interval` while items remain, so
//!   draining `n` items at rate `r` takes exactly `ceil(n / r)` ticks.
//! - **Spacing** holds across runs. A pacer started less than one `interval`
//!   after the previous slice waits until that interval has passed, so no
//!   window ever sees more than `max_rate` items.
//! - **Dispatch** does not wait for earlier slices. Save requests from
//!   consecutive ticks may overlap.
//! - **Halt** happens on the first failed save. Pacing stops, queued items
//!   are dropped and later enqueues fail with [`EnqueueError::Halted`].
//!
//! ## Dynamic Records
//!
//! With the `json` feature (on by default), [`Record`] models an untyped
//! object with a `className` and optional `objectId`. A
//! `RateLimiter<Record>` accepts raw JSON through `enqueue_value` and
//! `enqueue_all_values`:
//!
//! ```rust
//! # #[cfg(feature = "json")]
//! # {
//! use save_throttle::{BackendError, EnqueueError, FnBackend, RateLimiter, Record};
//! use serde_json::json;
//!
//! let backend = FnBackend::new(|_: Vec<Record>| async { Ok::<_, BackendError>(()) });
//! let limiter: RateLimiter<Record> = RateLimiter::new(10, backend).unwrap();
//!
//! let err = limiter
//!     .enqueue_all_values(json!([{"className": "Score"}, "not-an-item"]))
//!     .unwrap_err();
//! assert!(matches!(err, EnqueueError::InvalidItem { index: Some(1), .. }));
//! assert_eq!(limiter.queue_len(), 0);
//! # }
//! ```
//!
//! ## Observability
//!
//! The crate logs through `tracing` and never installs a subscriber. Ticks
//! and sub-batches are logged at `DEBUG`; a halt is logged at `WARN` with the
//! error and the number of discarded items. [`RateLimiter::metrics`] exposes
//! atomic counters:
//!
//! ```rust,no_run
//! # use save_throttle::{BackendError, FnBackend, RateLimiter, Record};
//! # let backend = FnBackend::new(|_: Vec<Record>| async { Ok::<_, BackendError>(()) });
//! # let limiter: RateLimiter<Record> = RateLimiter::new(10, backend).unwrap();
//! let snapshot = limiter.metrics().snapshot();
//! println!(
//!     "saved {}/{} items in {} ticks",
//!     snapshot.items_saved, snapshot.items_enqueued, snapshot.ticks
//! );
//! ```

// Domain layer - pure types
pub mod domain;

// Application layer - scheduling and dispatch
pub mod application;

// Infrastructure layer - backend adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    batch::{split_into_batches, ticks_to_drain},
    item::{Item, ItemRejection},
};

#[cfg(feature = "json")]
pub use domain::record::Record;

pub use application::{
    completion::{Completion, FinalizeError},
    config::{ConfigError, LimiterConfig},
    limiter::{EnqueueError, RateLimiter, RateLimiterBuilder},
    metrics::{Metrics, MetricsSnapshot},
    ports::{BackendError, SaveBackend},
};

pub use infrastructure::backend::FnBackend;
