//! Round countdown.
//!
//! Counts down from `ticks` at a fixed interval. With the default 3 ticks at
//! 600 ms the timeline is:
//!
//! | time    | event      |
//! |---------|------------|
//! | 0 ms    | `Tick(3)`  |
//! | 600 ms  | `Tick(2)`  |
//! | 1200 ms | `Tick(1)`  |
//! | 1800 ms | `Complete` |
//!
//! Every countdown gets a fresh generation. Tasks carry the generation they
//! were scheduled under, so a task from a cancelled or superseded countdown
//! is recognised as stale and ignored even if it was never unscheduled.

use serde::{Deserialize, Serialize};

use super::{Scheduler, TimerId};

/// Task the round timer schedules for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimerTask {
    generation: u64,
}

/// Handle to one countdown. Pass to `RoundTimer::cancel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancellationHandle {
    generation: u64,
}

/// What a fired round-timer task means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundTimerEvent {
    /// Countdown shows this number.
    Tick(u32),
    /// Countdown reached zero; resolve the round.
    Complete,
}

/// Single-instance countdown timer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundTimer {
    interval_ms: u64,
    generation: u64,
    remaining: u32,
    running: bool,
    pending: Option<TimerId>,
}

impl RoundTimer {
    /// Create an idle timer ticking every `interval_ms`.
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }

    /// Is a countdown in progress?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number the countdown will show next.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Start a countdown from `ticks`, cancelling any countdown in progress.
    ///
    /// The first tick is due immediately.
    pub fn start<T, S>(&mut self, ticks: u32, scheduler: &mut S) -> CancellationHandle
    where
        T: From<RoundTimerTask>,
        S: Scheduler<T>,
    {
        self.cancel_pending(scheduler);
        self.generation += 1;
        self.remaining = ticks;
        self.running = true;
        self.schedule_next(0, scheduler);
        CancellationHandle {
            generation: self.generation,
        }
    }

    /// Cancel the countdown `handle` refers to.
    ///
    /// Returns false if that countdown already finished or was superseded.
    pub fn cancel<T, S>(&mut self, handle: CancellationHandle, scheduler: &mut S) -> bool
    where
        S: Scheduler<T>,
    {
        if handle.generation != self.generation || !self.running {
            return false;
        }
        self.cancel_pending(scheduler);
        true
    }

    /// Cancel whatever countdown is in progress.
    pub fn cancel_pending<T, S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
    {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        if self.running {
            // Invalidate tasks that were already popped but not yet routed here
            self.generation += 1;
        }
        self.running = false;
        self.remaining = 0;
    }

    /// Handle a fired task. Returns `None` for stale tasks.
    pub fn fire<T, S>(&mut self, task: RoundTimerTask, scheduler: &mut S) -> Option<RoundTimerEvent>
    where
        T: From<RoundTimerTask>,
        S: Scheduler<T>,
    {
        if !self.running || task.generation != self.generation {
            return None;
        }
        self.pending = None;

        if self.remaining == 0 {
            self.running = false;
            return Some(RoundTimerEvent::Complete);
        }

        let shown = self.remaining;
        self.remaining -= 1;
        self.schedule_next(self.interval_ms, scheduler);
        Some(RoundTimerEvent::Tick(shown))
    }

    fn schedule_next<T, S>(&mut self, delay_ms: u64, scheduler: &mut S)
    where
        T: From<RoundTimerTask>,
        S: Scheduler<T>,
    {
        let task = RoundTimerTask {
            generation: self.generation,
        };
        self.pending = Some(scheduler.schedule(delay_ms, task.into()));
    }
}
