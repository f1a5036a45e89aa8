//! Activity records: the host-facing input side of every game
//!
//! Records are parsed best-effort into typed configuration, and each record
//! gets its own identifier namespace before anything is rendered.

pub mod context;
pub mod extract;
pub mod question;

pub use context::RenderContext;
pub use extract::{
    descending_fleet, extract_config, ActivityRecord, BattleshipsSettings, CardPair, GameConfig,
    GameSettings, MemorySettings,
};
pub use question::{Question, QuestionPool};
