//! Shared game-engine framework
//!
//! Every mini-game is an independent state machine built from the same
//! parts:
//! - `TimerQueue` sequences phases in logical time (no sleeping)
//! - `QuizGate` holds a gated action until a question is answered
//! - `Streak` pays out a bonus after consecutive successes
//! - `CompletionLatch` tells the host about a win exactly once
//! - `EventLog` feeds the UI what just happened

pub mod completion;
pub mod events;
pub mod quiz;
pub mod scoring;
pub mod streak;
pub mod timer;

pub use completion::{CompletionLatch, CompletionSink, NoopSink};
pub use events::{EventLog, LoggedEvent};
pub use quiz::{Accuracy, PendingQuiz, QuizGate, QuizResolution};
pub use scoring::{rate, Rating};
pub use streak::Streak;
pub use timer::{Scheduled, TimerQueue};

use crate::core::types::{GameType, InstanceId, Millis};

/// Operations every embedded game supports regardless of variant
pub trait MiniGame {
    fn instance_id(&self) -> &InstanceId;

    fn game_type(&self) -> GameType;

    /// Advance logical time, firing every transition that comes due
    fn advance(&mut self, elapsed: Millis);

    /// Discard the current session and start a fresh one
    fn restart(&mut self);

    /// True while a scheduled transition is pending and input is ignored
    fn is_locked(&self) -> bool;

    fn is_over(&self) -> bool;

    /// Whether the player won the current session
    fn is_won(&self) -> bool;
}
