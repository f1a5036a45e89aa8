//! Host-side receiver that queues completion signals for later persistence

use crate::core::types::InstanceId;
use crate::engine::CompletionSink;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared queue of finished instances.
///
/// Clones share one queue, so a host hands a clone to every game it spawns
/// and drains the original after each frame.
#[derive(Debug, Clone, Default)]
pub struct CompletionQueue {
    inner: Rc<RefCell<Vec<InstanceId>>>,
}

impl CompletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn contains(&self, instance: &InstanceId) -> bool {
        self.inner.borrow().contains(instance)
    }

    /// Remove and return everything queued so far
    pub fn drain(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }
}

impl CompletionSink for CompletionQueue {
    fn activity_completed(&mut self, instance: &InstanceId) {
        self.inner.borrow_mut().push(instance.clone());
    }
}
