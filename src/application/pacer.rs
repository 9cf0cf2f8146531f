//! Timer-driven slice release.
//!
//! The pacer is a single Tokio task. Its first tick fires immediately, or one
//! interval after the previous slice if the scheduler released one recently.
//! Each tick removes at most `max_rate` items from the front of the queue and hands
//! them to the dispatcher, and the task only waits for another interval while
//! items remain. At most one pacer task exists per scheduler.
//!
//! ```text
//!   idle ──start_if_idle──▶ armed ──interval──▶ draining ──queue empty──▶ idle
//!                             ▲                    │
//!                             └────items remain────┘
//! ```

use crate::application::dispatcher::DispatchOutcome;
use crate::application::limiter::{Core, State};
use crate::domain::item::Item;
use futures::future::FutureExt;
use std::sync::Arc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// What the pacer does after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Items remain; wait one interval and tick again
    Rearm,
    /// Nothing left to release; the task exits
    Idle,
}

/// Pacer task body.
async fn run<T>(core: Arc<Core<T>>, start: Instant)
where
    T: Item,
{
    let mut ticker = interval_at(start, core.config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if core.tick() == TickOutcome::Idle {
            break;
        }
    }
}

impl<T> Core<T>
where
    T: Item,
{
    /// Spawn the pacer unless one is already running or the scheduler halted.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn start_pacer_if_idle(self: &Arc<Self>, state: &mut State<T>) {
        if state.pacer.is_some() || state.halted {
            return;
        }
        // Never release two slices less than one interval apart
        let now = Instant::now();
        let start = state
            .last_tick
            .map(|last| (last + self.config.interval).max(now))
            .unwrap_or(now);

        debug!(
            queued = state.queue.len(),
            delay_ms = (start - now).as_millis() as u64,
            "starting pacer"
        );
        state.pacer = Some(tokio::spawn(run(Arc::clone(self), start)));
    }

    /// Release one slice.
    pub(crate) fn tick(self: &Arc<Self>) -> TickOutcome {
        let mut state = self.lock();

        if state.halted {
            state.pacer = None;
            return TickOutcome::Idle;
        }

        if state.queue.is_empty() {
            debug!("pacer ticked with an empty queue");
            state.pacer = None;
            if state.completion.is_some() {
                self.settle_after_in_flight(&mut state);
            }
            return TickOutcome::Idle;
        }

        let slice = state.queue.take_front(self.config.max_rate);
        let slice_len = slice.len();
        state.last_tick = Some(Instant::now());
        self.metrics.record_tick();

        let outcome = self.spawn_dispatch(slice);
        state.in_flight.record(outcome);
        state.dispatches += 1;

        let remaining = state.queue.len();
        debug!(
            slice = slice_len,
            remaining,
            in_flight = state.in_flight.len(),
            "released slice"
        );

        if remaining > 0 {
            return TickOutcome::Rearm;
        }

        state.pacer = None;
        if state.completion.is_some() {
            self.settle_after_in_flight(&mut state);
        }
        TickOutcome::Idle
    }

    /// Submit a slice and halt the scheduler if it fails.
    fn spawn_dispatch(self: &Arc<Self>, slice: Vec<T>) -> DispatchOutcome {
        let outcome = self.dispatcher.dispatch(slice).shared();

        let watched = outcome.clone();
        let core = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = watched.await {
                core.halt(err);
            }
        });

        outcome
    }

    /// Resolve the pending completion once every in-flight dispatch succeeds.
    fn settle_after_in_flight(self: &Arc<Self>, state: &mut State<T>) {
        let joined = state.in_flight.joined();
        let dispatches = state.dispatches;
        let core = Arc::clone(self);
        tokio::spawn(async move {
            if joined.await.is_ok() {
                core.drained(dispatches);
            }
        });
    }

    /// Called when every dispatch up to `dispatches` has succeeded.
    fn drained(self: &Arc<Self>, dispatches: u64) {
        let mut state = self.lock();

        // A later dispatch owns the completion now
        if state.halted || state.dispatches != dispatches {
            return;
        }

        // Items enqueued after the pacer went idle still belong to this run
        if !state.queue.is_empty() {
            debug!(
                queued = state.queue.len(),
                "items arrived after drain, restarting pacer"
            );
            self.start_pacer_if_idle(&mut state);
            return;
        }

        if let Some(request) = state.completion.take() {
            debug!(dispatches, "all queued items saved");
            request.resolve();
        }
    }
}
