//! Completion signaling toward the host page
//!
//! The engine's only outbound contract: on a win it tells the host which
//! instance finished. Persisting that fact is the host's job.

use crate::core::types::InstanceId;

/// Host-provided receiver of completion signals
pub trait CompletionSink {
    fn activity_completed(&mut self, instance: &InstanceId);
}

impl<F: FnMut(&InstanceId)> CompletionSink for F {
    fn activity_completed(&mut self, instance: &InstanceId) {
        self(instance)
    }
}

/// Sink for games embedded without a tracking host
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl CompletionSink for NoopSink {
    fn activity_completed(&mut self, _instance: &InstanceId) {}
}

/// Per-instance record that the host has been told, set at most once.
///
/// Survives restarts, so replaying a won game never re-signals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompletionLatch {
    signaled: bool,
}

impl CompletionLatch {
    pub fn is_signaled(&self) -> bool {
        self.signaled
    }

    /// Signal the host unless it already was. Returns true if it fired now.
    pub fn fire(&mut self, sink: &mut dyn CompletionSink, instance: &InstanceId) -> bool {
        if self.signaled {
            return false;
        }
        self.signaled = true;
        tracing::info!(instance = %instance, "Activity completed, notifying host");
        sink.activity_completed(instance);
        true
    }
}
