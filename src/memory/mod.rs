//! Memory-match: find every pair of cards in as few moves as possible
//!
//! The second exemplar of the engine framework. A correct answer buys a
//! short peek at the whole board; a streak of matches highlights one card.

pub mod game;

pub use game::{
    Card, CardState, FlipResponse, MemoryEvent, MemoryMatchGame, MemoryPhase, MemorySession,
    MemoryTimer,
};
