//! Bounded per-session event log for UI feedback

use crate::core::types::Millis;
use std::collections::VecDeque;

/// An event stamped with the logical time it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent<E> {
    pub at: Millis,
    pub event: E,
}

#[derive(Debug, Clone)]
pub struct EventLog<E> {
    capacity: usize,
    entries: VecDeque<LoggedEvent<E>>,
}

impl<E> EventLog<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Append, evicting the oldest entry when full
    pub fn push(&mut self, at: Millis, event: E) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedEvent { at, event });
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent<E>> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&E> {
        self.entries.back().map(|e| &e.event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::new(2);
        log.push(0, "a");
        log.push(1, "b");
        log.push(2, "c");
        let kept: Vec<_> = log.iter().map(|e| e.event).collect();
        assert_eq!(kept, vec!["b", "c"]);
        assert_eq!(log.last(), Some(&"c"));
    }
}
