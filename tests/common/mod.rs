//! Shared fixtures for integration tests.

#![allow(dead_code)]

use save_throttle::infrastructure::mocks::MockBackend;
use save_throttle::{Item, ItemRejection, RateLimiter};
use std::time::Duration;

/// Minimal item keyed by a static name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc(pub String);

impl Doc {
    pub fn new(id: impl Into<String>) -> Self {
        Doc(id.into())
    }
}

impl Item for Doc {
    fn kind(&self) -> &str {
        "Doc"
    }

    fn id(&self) -> Option<&str> {
        Some(&self.0)
    }

    fn validate(&self) -> Result<(), ItemRejection> {
        if self.0.is_empty() {
            return Err(ItemRejection::new("empty id"));
        }
        Ok(())
    }
}

pub fn docs(ids: &[&str]) -> Vec<Doc> {
    ids.iter().map(|id| Doc::new(*id)).collect()
}

pub fn numbered(count: usize) -> Vec<Doc> {
    (0..count).map(|i| Doc(format!("doc-{i}"))).collect()
}

/// Limiter with a one-second interval over `backend`.
pub fn limiter(
    max_rate: usize,
    max_batch_size: usize,
    backend: &MockBackend<Doc>,
) -> RateLimiter<Doc> {
    RateLimiter::builder()
        .with_max_rate(max_rate)
        .with_interval(Duration::from_secs(1))
        .with_max_batch_size(max_batch_size)
        .build(backend.clone())
        .unwrap()
}
