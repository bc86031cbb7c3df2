//! Virtual-time timer queue.
//!
//! Tasks are ordered by due time, then by the order they were scheduled.
//! Cancellation is lazy: the task is dropped from the live table and its
//! heap slot is skipped when it surfaces.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use super::{Scheduler, TimerId};

/// A task that has fallen due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiredTimer<T> {
    pub id: TimerId,
    pub due_at: u64,
    pub task: T,
}

/// Deterministic scheduler driven by explicit time advances.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    now: u64,
    next_id: u64,
    heap: BinaryHeap<Reverse<(u64, TimerId)>>,
    live: FxHashMap<TimerId, (u64, T)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            heap: BinaryHeap::new(),
            live: FxHashMap::default(),
        }
    }

    /// Number of tasks still waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Is this task still waiting to fire?
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.live.values().map(|(due, _)| *due).min()
    }

    /// Pop the next task due at or before `until`.
    ///
    /// The clock moves forward to the task's due time.
    pub fn pop_due(&mut self, until: u64) -> Option<FiredTimer<T>> {
        while let Some(&Reverse((due_at, id))) = self.heap.peek() {
            if !self.live.contains_key(&id) {
                self.heap.pop();
                continue;
            }
            if due_at > until {
                return None;
            }
            self.heap.pop();
            let (_, task) = self.live.remove(&id)?;
            self.now = self.now.max(due_at);
            return Some(FiredTimer { id, due_at, task });
        }
        None
    }

    /// Move the clock forward without firing anything.
    ///
    /// Time never runs backwards.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }
}

impl<T> Scheduler<T> for TimerQueue<T> {
    fn now(&self) -> u64 {
        self.now
    }

    fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        let due_at = self.now.saturating_add(delay_ms);
        self.heap.push(Reverse((due_at, id)));
        self.live.insert(id, (due_at, task));
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(300, "c");
        queue.schedule(100, "a");
        queue.schedule(200, "b");

        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(1_000))
            .map(|f| f.task)
            .collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert_eq!(queue.now(), 300);
    }

    #[test]
    fn test_same_instant_keeps_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(50, 1);
        queue.schedule(50, 2);
        queue.schedule(50, 3);

        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(50))
            .map(|f| f.task)
            .collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut queue = TimerQueue::new();
        queue.schedule(100, ());

        assert!(queue.pop_due(99).is_none());
        assert_eq!(queue.pending_count(), 1);
        assert!(queue.pop_due(100).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let keep = queue.schedule(10, "keep");
        let dropped = queue.schedule(5, "dropped");

        assert!(queue.cancel(dropped));
        assert!(!queue.cancel(dropped));
        assert!(queue.is_pending(keep));
        assert_eq!(queue.next_due(), Some(10));

        let fired = queue.pop_due(100).unwrap();
        assert_eq!(fired.task, "keep");
        assert!(queue.pop_due(100).is_none());
    }

    #[test]
    fn test_delay_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance_to(1_000);
        queue.schedule(250, ());

        assert_eq!(queue.next_due(), Some(1_250));

        // Clock never runs backwards
        queue.advance_to(10);
        assert_eq!(queue.now(), 1_000);
    }
}
