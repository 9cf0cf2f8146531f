//! Domain layer - pure types with no runtime dependencies.
//!
//! This layer contains the concepts the scheduler is built from:
//! - The item contract checked at the enqueue boundary
//! - Slice and sub-batch partitioning
//! - Dynamic JSON records (with the `json` feature)
//!
//! All types in this layer are pure and easily testable.

pub mod batch;
pub mod item;

#[cfg(feature = "json")]
pub mod record;
