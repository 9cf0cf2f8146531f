//! Slice and sub-batch arithmetic.
//!
//! A slice is the rate-capped prefix released on one pacing tick; a
//! sub-batch is a backend-size-capped partition of a slice. Both are pure
//! functions of their inputs.

/// Split `items` into consecutive chunks of at most `max_size`, keeping order.
///
/// An empty input yields no chunks.
///
/// # Panics
/// Panics if `max_size` is zero. Configuration validation rules this out
/// before any slice reaches the dispatcher.
///
/// # Example
/// ```
/// use save_throttle::domain::batch::split_into_batches;
///
/// let batches = split_into_batches(vec![1, 2, 3, 4, 5], 2);
/// assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn split_into_batches<T>(items: Vec<T>, max_size: usize) -> Vec<Vec<T>> {
    assert!(max_size > 0, "batch size must be greater than 0");

    let mut batches = Vec::with_capacity(items.len().div_ceil(max_size));
    let mut iter = items.into_iter().peekable();

    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(max_size).collect());
    }

    batches
}

/// Number of pacing ticks needed to drain `queued` items at `max_rate` per tick.
///
/// ```
/// use save_throttle::domain::batch::ticks_to_drain;
///
/// assert_eq!(ticks_to_drain(5, 2), 3);
/// assert_eq!(ticks_to_drain(0, 2), 0);
/// ```
pub fn ticks_to_drain(queued: usize, max_rate: usize) -> usize {
    if max_rate == 0 {
        return 0;
    }
    queued.div_ceil(max_rate)
}
