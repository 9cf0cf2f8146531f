//! Mock implementations for testing.
//!
//! Test doubles for the save backend and for log output, so scheduler
//! behavior can be asserted without a real storage service.

pub mod backend;
pub mod layer;

pub use backend::{MockBackend, SaveCall};
pub use layer::{CapturedEvent, MockCaptureLayer};
