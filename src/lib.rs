//! Quiz Arcade - quiz-gated mini-games for packaged lessons

pub mod activity;
pub mod battleships;
pub mod core;
pub mod engine;
pub mod host;
pub mod memory;
pub mod render;
