//! Infrastructure layer - adapters for external systems.
//!
//! This layer provides:
//! - Closure-backed save backends
//! - Test doubles for the backend and for `tracing` output

pub mod backend;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// save-throttle = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
