pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, EngineConfig, ParTier};
pub use error::{ArcadeError, Result};
pub use types::{Coord, GameType, InstanceId, Millis};
