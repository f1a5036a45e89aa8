//! Logical timer service
//!
//! Games never sleep. Every "wait for the animation" step is an event
//! scheduled on a `TimerQueue`, and the caller advances logical time. Tests
//! advance time explicitly; a browser host would feed it frame deltas.
//!
//! Scheduled events cannot be cancelled. Each one carries the generation of
//! the session that scheduled it, and the owning game drops events whose
//! generation is stale.

use crate::core::types::Millis;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An event waiting in the queue
#[derive(Debug, Clone)]
pub struct Scheduled<E> {
    pub due: Millis,
    pub generation: u64,
    pub event: E,
    seq: u64,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the BinaryHeap pops the earliest (due, seq) first
impl<E> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now: Millis,
    next_seq: u64,
    pending: BinaryHeap<Scheduled<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `event` to fire `delay` ms from now
    pub fn schedule(&mut self, delay: Millis, generation: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: self.now + delay,
            generation,
            event,
            seq,
        });
    }

    /// Pop the earliest event due at or before `until`.
    ///
    /// The clock moves to the event's due time, so handlers that schedule
    /// follow-ups measure their delay from the right instant. Events with
    /// equal due times fire in scheduling order.
    pub fn pop_due(&mut self, until: Millis) -> Option<Scheduled<E>> {
        if self.pending.peek().is_some_and(|s| s.due <= until) {
            let next = self.pending.pop()?;
            self.now = self.now.max(next.due);
            Some(next)
        } else {
            None
        }
    }

    /// Move the clock to `until` once every due event has been handled
    pub fn settle(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }

    /// Time of the next pending event, if any
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.peek().map(|s| s.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300, 0, "late");
        timers.schedule(100, 0, "early");
        timers.schedule(100, 0, "early-second");

        let mut fired = Vec::new();
        while let Some(s) = timers.pop_due(1000) {
            fired.push((s.due, s.event));
        }
        assert_eq!(
            fired,
            vec![(100, "early"), (100, "early-second"), (300, "late")]
        );
    }

    #[test]
    fn test_nothing_fires_before_due() {
        let mut timers = TimerQueue::new();
        timers.schedule(500, 0, ());
        assert!(timers.pop_due(499).is_none());
        timers.settle(499);
        assert_eq!(timers.now(), 499);
        assert!(timers.pop_due(500).is_some());
    }

    #[test]
    fn test_followups_are_relative_to_due_time() {
        let mut timers = TimerQueue::new();
        timers.schedule(100, 0, 1);
        let first = timers.pop_due(1000).unwrap();
        assert_eq!(timers.now(), 100);
        timers.schedule(50, first.generation, 2);
        let second = timers.pop_due(1000).unwrap();
        assert_eq!(second.due, 150);
    }

    #[test]
    fn test_generation_is_carried() {
        let mut timers = TimerQueue::new();
        timers.schedule(10, 7, ());
        assert_eq!(timers.pop_due(10).unwrap().generation, 7);
    }
}
