//! Rule-flip scheduler for the flipping variant.
//!
//! Toggles the active `RuleSet` every `period_ms`. Each time a rule becomes
//! active:
//!
//! 1. `RuleChanged(rule)` is emitted immediately
//! 2. after `notice_ms` the notice expires (`NoticeExpired(rule)`) and the
//!    countdown-to-next-flip starts at `countdown_steps`
//! 3. the countdown ticks down once per `countdown_interval_ms`
//!
//! With the defaults (17 s period, 2 s notice, 15 steps of 1 s) the
//! countdown shows 15 at 2 s and 1 at 16 s; the flip at 17 s replaces the
//! final step.
//!
//! ## Restarts
//!
//! `start` always begins at `Normal` and cancels every timer a previous run
//! left pending, so there is never more than one flip timer.

use serde::{Deserialize, Serialize};

use crate::core::{FlipConfig, RuleSet};

use super::{Scheduler, TimerId};

/// What a flip-scheduler task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipTaskKind {
    Flip,
    NoticeExpired,
    CountdownStart,
    CountdownTick,
}

/// Task the flip scheduler schedules for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipTask {
    generation: u64,
    kind: FlipTaskKind,
}

impl FlipTask {
    /// What this task does.
    #[must_use]
    pub fn kind(&self) -> FlipTaskKind {
        self.kind
    }
}

/// Notifications produced by the flip scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipEvent {
    /// This rule is now active; show the banner.
    RuleChanged(RuleSet),
    /// The banner for this rule should be hidden.
    NoticeExpired(RuleSet),
    /// Steps left before the next flip.
    CountdownTick(u32),
}

/// Periodic Normal/Reversed toggler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleFlipScheduler {
    config: FlipConfig,
    rule: RuleSet,
    generation: u64,
    running: bool,
    flip_timer: Option<TimerId>,
    notice_timer: Option<TimerId>,
    countdown_timer: Option<TimerId>,
    countdown_remaining: u32,
}

impl RuleFlipScheduler {
    /// Create a stopped scheduler.
    #[must_use]
    pub fn new(config: FlipConfig) -> Self {
        Self {
            config,
            rule: RuleSet::Normal,
            generation: 0,
            running: false,
            flip_timer: None,
            notice_timer: None,
            countdown_timer: None,
            countdown_remaining: 0,
        }
    }

    /// The rule currently in force.
    #[must_use]
    pub fn active_rule(&self) -> RuleSet {
        self.rule
    }

    /// Is the scheduler running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Steps left on the countdown-to-next-flip (0 while the notice shows).
    #[must_use]
    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    /// Number of this scheduler's timers still pending.
    #[must_use]
    pub fn active_timer_count(&self) -> usize {
        [self.flip_timer, self.notice_timer, self.countdown_timer]
            .iter()
            .filter(|t| t.is_some())
            .count()
    }

    /// Start (or restart) at `Normal`.
    ///
    /// Returns the `RuleChanged` notification for the initial rule.
    pub fn start<T, S>(&mut self, scheduler: &mut S) -> FlipEvent
    where
        T: From<FlipTask>,
        S: Scheduler<T>,
    {
        self.stop(scheduler);
        self.running = true;
        self.rule = RuleSet::Normal;
        self.flip_timer = Some(self.schedule(self.config.period_ms, FlipTaskKind::Flip, scheduler));
        self.enter_rule(scheduler);
        FlipEvent::RuleChanged(self.rule)
    }

    /// Cancel every pending timer. No flip fires until the next `start`.
    pub fn stop<T, S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<T>,
    {
        for id in [
            self.flip_timer.take(),
            self.notice_timer.take(),
            self.countdown_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            scheduler.cancel(id);
        }
        self.generation += 1;
        self.running = false;
        self.countdown_remaining = 0;
    }

    /// Handle a fired task. Returns `None` for stale tasks.
    pub fn fire<T, S>(&mut self, task: FlipTask, scheduler: &mut S) -> Option<FlipEvent>
    where
        T: From<FlipTask>,
        S: Scheduler<T>,
    {
        if !self.running || task.generation != self.generation {
            return None;
        }

        match task.kind {
            FlipTaskKind::Flip => {
                self.flip_timer =
                    Some(self.schedule(self.config.period_ms, FlipTaskKind::Flip, scheduler));
                self.rule = self.rule.flipped();
                self.enter_rule(scheduler);
                Some(FlipEvent::RuleChanged(self.rule))
            }
            FlipTaskKind::NoticeExpired => {
                self.notice_timer = None;
                Some(FlipEvent::NoticeExpired(self.rule))
            }
            FlipTaskKind::CountdownStart => {
                self.countdown_remaining = self.config.countdown_steps;
                self.schedule_countdown_step(scheduler);
                Some(FlipEvent::CountdownTick(self.countdown_remaining))
            }
            FlipTaskKind::CountdownTick => {
                self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
                self.schedule_countdown_step(scheduler);
                Some(FlipEvent::CountdownTick(self.countdown_remaining))
            }
        }
    }

    /// Replace the notice and countdown timers for the rule just entered.
    fn enter_rule<T, S>(&mut self, scheduler: &mut S)
    where
        T: From<FlipTask>,
        S: Scheduler<T>,
    {
        for id in [self.notice_timer.take(), self.countdown_timer.take()]
            .into_iter()
            .flatten()
        {
            scheduler.cancel(id);
        }
        self.countdown_remaining = 0;
        let notice_ms = self.config.notice_ms;
        self.notice_timer = Some(self.schedule(notice_ms, FlipTaskKind::NoticeExpired, scheduler));
        self.countdown_timer =
            Some(self.schedule(notice_ms, FlipTaskKind::CountdownStart, scheduler));
    }

    fn schedule_countdown_step<T, S>(&mut self, scheduler: &mut S)
    where
        T: From<FlipTask>,
        S: Scheduler<T>,
    {
        self.countdown_timer = if self.countdown_remaining > 0 {
            let interval = self.config.countdown_interval_ms;
            Some(self.schedule(interval, FlipTaskKind::CountdownTick, scheduler))
        } else {
            None
        };
    }

    fn schedule<T, S>(&self, delay_ms: u64, kind: FlipTaskKind, scheduler: &mut S) -> TimerId
    where
        T: From<FlipTask>,
        S: Scheduler<T>,
    {
        let task = FlipTask {
            generation: self.generation,
            kind,
        };
        scheduler.schedule(delay_ms, task.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimerQueue;

    fn run(
        flips: &mut RuleFlipScheduler,
        queue: &mut TimerQueue<FlipTask>,
        until: u64,
    ) -> Vec<(u64, FlipEvent)> {
        let mut events = Vec::new();
        while let Some(fired) = queue.pop_due(until) {
            if let Some(event) = flips.fire(fired.task, queue) {
                events.push((fired.due_at, event));
            }
        }
        queue.advance_to(until);
        events
    }

    #[test]
    fn test_start_announces_normal() {
        let mut queue: TimerQueue<FlipTask> = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());

        assert_eq!(flips.start(&mut queue), FlipEvent::RuleChanged(RuleSet::Normal));
        assert_eq!(flips.active_rule(), RuleSet::Normal);
        assert_eq!(flips.active_timer_count(), 3);
    }

    #[test]
    fn test_first_period_timeline() {
        let mut queue = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());
        flips.start(&mut queue);

        let events = run(&mut flips, &mut queue, 17_000);

        assert_eq!(events[0], (2_000, FlipEvent::NoticeExpired(RuleSet::Normal)));
        assert_eq!(events[1], (2_000, FlipEvent::CountdownTick(15)));
        assert_eq!(events[15], (16_000, FlipEvent::CountdownTick(1)));
        assert_eq!(events[16], (17_000, FlipEvent::RuleChanged(RuleSet::Reversed)));
        assert_eq!(events.len(), 17);
        assert_eq!(flips.active_rule(), RuleSet::Reversed);
    }

    #[test]
    fn test_flips_back_after_two_periods() {
        let mut queue = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());
        flips.start(&mut queue);

        let events = run(&mut flips, &mut queue, 34_000);
        let changes: Vec<_> = events
            .iter()
            .filter_map(|(_, e)| match e {
                FlipEvent::RuleChanged(rule) => Some(*rule),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![RuleSet::Reversed, RuleSet::Normal]);
    }

    #[test]
    fn test_countdown_remaining_follows_ticks() {
        let mut queue = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());
        flips.start(&mut queue);
        assert_eq!(flips.countdown_remaining(), 0);

        run(&mut flips, &mut queue, 2_000);
        assert_eq!(flips.countdown_remaining(), 15);

        run(&mut flips, &mut queue, 16_000);
        assert_eq!(flips.countdown_remaining(), 1);

        // The flip restarts the notice window
        run(&mut flips, &mut queue, 17_000);
        assert_eq!(flips.countdown_remaining(), 0);
    }

    #[test]
    fn test_double_start_leaves_one_flip_timer() {
        let mut queue = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());
        flips.start(&mut queue);
        run(&mut flips, &mut queue, 5_000);
        flips.start(&mut queue);

        assert_eq!(queue.pending_count(), 3);

        let events = run(&mut flips, &mut queue, 5_000 + 17_000);
        let changes = events
            .iter()
            .filter(|(_, e)| matches!(e, FlipEvent::RuleChanged(_)))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_stop_silences_everything() {
        let mut queue = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());
        flips.start(&mut queue);
        flips.stop(&mut queue);

        assert!(!flips.is_running());
        assert_eq!(queue.pending_count(), 0);
        assert!(run(&mut flips, &mut queue, 100_000).is_empty());
    }

    #[test]
    fn test_restart_resets_to_normal() {
        let mut queue = TimerQueue::new();
        let mut flips = RuleFlipScheduler::new(FlipConfig::default());
        flips.start(&mut queue);
        run(&mut flips, &mut queue, 17_000);
        assert_eq!(flips.active_rule(), RuleSet::Reversed);

        flips.stop(&mut queue);
        flips.start(&mut queue);
        assert_eq!(flips.active_rule(), RuleSet::Normal);
    }
}
