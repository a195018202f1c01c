//! Wall-clock accounting for strategy slices.
//!
//! Deciseconds (100 ms) are the native unit for time options. A `SliceTimer`
//! is created per slice; the saturation loop polls `time_limit_reached` at
//! its designated check points, never anywhere else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Milliseconds per decisecond, the conversion used throughout.
pub const MS_PER_DECISECOND: u64 = 100;

/// Cooperative cancellation flag, polled at the same points as the deadline.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-slice monotonic clock with a decisecond budget.
#[derive(Clone, Debug)]
pub struct SliceTimer {
    start: Instant,
    /// Slice budget in deciseconds; 0 means no limit
    limit_deciseconds: u32,
    /// Overrides the perceived budget for limit estimation only
    simulated_deciseconds: Option<u32>,
    cancel: CancellationToken,
}

impl SliceTimer {
    pub fn new(limit_deciseconds: u32, cancel: CancellationToken) -> Self {
        SliceTimer {
            start: Instant::now(),
            limit_deciseconds,
            simulated_deciseconds: None,
            cancel,
        }
    }

    pub fn with_simulated(mut self, simulated: Option<u32>) -> Self {
        self.simulated_deciseconds = simulated;
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// True once the real budget is exhausted or cancellation was requested.
    pub fn time_limit_reached(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        if self.limit_deciseconds == 0 {
            return false;
        }
        self.elapsed_ms() >= self.limit_deciseconds as u64 * MS_PER_DECISECOND
    }

    pub fn cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Budget in milliseconds as perceived by the limit estimator.
    ///
    /// The simulated limit, when set, replaces the real one in the estimate
    /// but never affects the actual deadline.
    pub fn perceived_limit_ms(&self) -> u64 {
        let ds = self.simulated_deciseconds.unwrap_or(self.limit_deciseconds);
        ds as u64 * MS_PER_DECISECOND
    }

    pub fn limit_deciseconds(&self) -> u32 {
        self.limit_deciseconds
    }
}
