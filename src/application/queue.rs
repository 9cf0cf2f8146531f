//! Pending-item buffer.

use std::collections::VecDeque;

/// FIFO buffer of items awaiting dispatch.
///
/// Insertion order is dispatch order. Items are never reordered or
/// deduplicated.
#[derive(Debug)]
pub(crate) struct SaveQueue<T> {
    items: VecDeque<T>,
}

impl<T> SaveQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    pub(crate) fn extend(&mut self, items: Vec<T>) {
        self.items.extend(items);
    }

    /// Remove up to `max` items from the front.
    pub(crate) fn take_front(&mut self, max: usize) -> Vec<T> {
        let count = max.min(self.items.len());
        self.items.drain(..count).collect()
    }

    /// Drop every queued item, returning how many were dropped.
    pub(crate) fn discard(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for SaveQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
