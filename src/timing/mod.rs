//! Timers: the scheduler interface and the two timers built on it.
//!
//! ## Scheduler
//!
//! `Scheduler` is the seam between game logic and whatever runs the clock.
//! Tasks are plain data; the owner of the scheduler pops them when they fall
//! due and routes each one back to the timer that scheduled it. No callback
//! closures are stored, so a cancelled or superseded timer can never fire
//! into torn-down state.
//!
//! `TimerQueue` is the deterministic virtual-time implementation used by the
//! session, the simulator and the tests.
//!
//! ## Timers
//!
//! - `RoundTimer`: the 3-2-1 countdown before a round resolves
//! - `RuleFlipScheduler`: periodic Normal/Reversed rule toggling

mod queue;
mod round_timer;
mod rule_flip;

pub use queue::{FiredTimer, TimerQueue};
pub use round_timer::{CancellationHandle, RoundTimer, RoundTimerEvent, RoundTimerTask};
pub use rule_flip::{FlipEvent, FlipTask, FlipTaskKind, RuleFlipScheduler};

use serde::{Deserialize, Serialize};

/// Identifier of a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Create a new timer ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// Schedules tasks to fire after a delay.
///
/// ## Implementation Notes
///
/// - `schedule`: `delay_ms` is relative to `now()`; zero means "next dispatch"
/// - `cancel`: returns false if the task already fired or was cancelled
/// - Tasks due at the same instant fire in scheduling order
pub trait Scheduler<T> {
    /// Current time in milliseconds.
    fn now(&self) -> u64;

    /// Schedule `task` to fire `delay_ms` from now.
    fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId;

    /// Cancel a pending task.
    fn cancel(&mut self, id: TimerId) -> bool;
}
