//! Search control: time budget and external abort.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Why a search episode stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbortReason {
    /// Not aborted.
    #[default]
    None,
    /// The timer ran out.
    Time,
    /// Somebody called [`AbortHandle::abort`].
    External,
}

/// Source of the per-move time budget.
///
/// Polled at every node entry, so implementations must be cheap and must
/// never block.
pub trait Timer {
    /// Whether the current move may keep searching.
    fn have_time_left_for_move(&self) -> bool;
}

/// Timer that never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl Timer for Unlimited {
    fn have_time_left_for_move(&self) -> bool {
        true
    }
}

/// Wall-clock budget measured from construction or the last [`restart`](Self::restart).
#[derive(Debug)]
pub struct MoveTimer {
    budget: Duration,
    start: Mutex<Instant>,
}

impl MoveTimer {
    /// Start a timer allowing `budget` per move.
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            start: Mutex::new(Instant::now()),
        }
    }

    /// Begin a new move's budget.
    pub fn restart(&self) {
        *self.start.lock().expect("timer mutex poisoned") = Instant::now();
    }

    /// Time spent on the current move.
    pub fn elapsed(&self) -> Duration {
        self.start.lock().expect("timer mutex poisoned").elapsed()
    }

    /// Budget per move.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl Timer for MoveTimer {
    fn have_time_left_for_move(&self) -> bool {
        self.elapsed() < self.budget
    }
}

/// Cloneable handle for interrupting a search from another thread.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Create a handle that is not raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running search to stop at its next node.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether an abort has been requested.
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything a node polls to decide whether to keep searching.
pub(crate) struct SearchControl {
    timer: Arc<dyn Timer + Send + Sync>,
    abort: AbortHandle,
}

impl SearchControl {
    pub(crate) fn new(timer: Arc<dyn Timer + Send + Sync>, abort: AbortHandle) -> Self {
        Self { timer, abort }
    }

    /// Current abort status. External requests take precedence over time.
    pub(crate) fn poll(&self) -> AbortReason {
        if self.abort.is_aborted() {
            AbortReason::External
        } else if !self.timer.have_time_left_for_move() {
            AbortReason::Time
        } else {
            AbortReason::None
        }
    }
}
