//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages the runtime behavior:
//! - Pending-item queue (FIFO buffer)
//! - Pacer (timer-driven slice release)
//! - Dispatcher (sub-batch fan-out and join)
//!
//! ## Ports
//!
//! The application layer defines the [`ports::SaveBackend`] trait that
//! storage adapters must implement. This keeps the scheduler independent
//! from how items are actually persisted.

pub mod completion;
pub mod config;
pub(crate) mod dispatcher;
pub mod limiter;
pub mod metrics;
pub(crate) mod pacer;
pub mod ports;
pub(crate) mod queue;
