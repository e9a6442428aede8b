//! Cooperative cancellation and step-by-step pacing shared by all algorithms.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::maze::{CellValue, Grid, Position};

/// Longest uninterrupted sleep while pacing, a.k.a. the cancellation latency of a pause.
const SLEEP_SLICE: Duration = Duration::from_millis(5);

/// A cloneable cancellation flag, polled by running algorithms at loop granularity.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone of this token observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless cancelled first.
    /// Returns `false` if the sleep was cut short by cancellation.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        while !self.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
        false
    }
}

/// Per-invocation execution mode of an algorithm: whether it pauses to show its
/// progress, and the token it polls to stop early.
#[derive(Debug, Clone, Copy)]
pub struct Stepper<'a> {
    step_by_step: bool,
    cancel: &'a CancelToken,
}

impl<'a> Stepper<'a> {
    pub fn new(step_by_step: bool, cancel: &'a CancelToken) -> Self {
        Stepper {
            step_by_step,
            cancel,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Temporarily show `marker` on the cell at `position` for `delay`, then restore
    /// its previous value. Returns `false` if the algorithm must stop.
    pub fn flash(
        &self,
        grid: &mut Grid,
        position: Position,
        marker: CellValue,
        delay: Duration,
    ) -> bool {
        if !self.step_by_step {
            return !self.is_stopped();
        }
        let previous = grid.value(position);
        grid.set_value(position, marker);
        self.cancel.sleep(delay);
        grid.set_value(position, previous);
        !self.is_stopped()
    }

    /// Leave `marker` on an empty cell at `position` and wait `delay`. The marker stays
    /// until [`clear_markers`] runs. Non-empty cells keep their value.
    /// Returns `false` if the algorithm must stop.
    pub fn mark(
        &self,
        grid: &mut Grid,
        position: Position,
        marker: CellValue,
        delay: Duration,
    ) -> bool {
        if !self.step_by_step {
            return !self.is_stopped();
        }
        if grid.value(position) == CellValue::Empty {
            grid.set_value(position, marker);
        }
        self.cancel.sleep(delay);
        !self.is_stopped()
    }
}

/// Turn every transient marker left on the grid back into an empty cell.
pub fn clear_markers(grid: &mut Grid) {
    for position in grid.positions() {
        if grid.value(position).is_marker() {
            grid.set_value(position, CellValue::Empty);
        }
    }
}
