//! Engine tuning constants
//!
//! Every delay, threshold and limit the game engines use lives here, so a
//! deployment can retune pacing from one TOML file without touching engine
//! code.

use crate::core::error::{ArcadeError, Result};
use crate::core::types::Millis;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of a par table: finishing within `max_turns` earns `stars`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParTier {
    pub max_turns: u32,
    pub stars: u8,
    pub label: String,
}

impl ParTier {
    pub fn new(max_turns: u32, stars: u8, label: &str) -> Self {
        Self {
            max_turns,
            stars,
            label: label.to_string(),
        }
    }
}

/// Configuration shared by every game engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === PACING ===
    /// Lock after the player's shot resolves, before the opponent moves
    pub player_settle_ms: Millis,

    /// Lock after the opponent fires, before control returns to the player
    pub opponent_think_ms: Millis,

    /// How long a mismatched memory pair stays face up
    pub flip_back_ms: Millis,

    /// How long a streak or peek reveal stays highlighted
    pub reveal_duration_ms: Millis,

    // === BONUS MECHANICS ===
    /// Consecutive successful direct actions that trigger a reveal
    pub streak_threshold: u32,

    /// Chebyshev radius of the area weapon (1 = 3×3 square)
    pub area_radius: usize,

    /// Extra moves charged for a failed memory-match peek question
    pub peek_penalty_moves: u32,

    // === SEARCH LIMITS ===
    /// Random placement attempts per ship before it is left unplaced
    pub placement_attempts: u32,

    /// Random hunt attempts before the AI falls back to a scan
    pub hunt_attempts: u32,

    /// Maximum entries kept in a session's event log
    pub event_log_capacity: usize,

    // === RATING ===
    /// Battleships tiers by player turns, best first
    pub battleships_par: Vec<ParTier>,

    /// Memory-match tiers by moves, best first
    pub memory_par: Vec<ParTier>,

    /// Label used when no tier matches
    pub unrated_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_settle_ms: 900,
            opponent_think_ms: 1100,
            flip_back_ms: 1000,
            reveal_duration_ms: 2500,

            streak_threshold: 3,
            area_radius: 1,
            peek_penalty_moves: 2,

            placement_attempts: 100,
            hunt_attempts: 100,
            event_log_capacity: 64,

            battleships_par: vec![
                ParTier::new(30, 3, "Admiral"),
                ParTier::new(45, 2, "Captain"),
                ParTier::new(60, 1, "Ensign"),
            ],
            memory_par: vec![
                ParTier::new(10, 3, "Photographic"),
                ParTier::new(16, 2, "Sharp"),
                ParTier::new(24, 1, "Steady"),
            ],
            unrated_label: "Cadet".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.streak_threshold == 0 {
            return Err(ArcadeError::InvalidConfig(
                "streak_threshold must be at least 1".into(),
            ));
        }
        if self.placement_attempts == 0 || self.hunt_attempts == 0 {
            return Err(ArcadeError::InvalidConfig(
                "attempt limits must be positive".into(),
            ));
        }
        if self.event_log_capacity == 0 {
            return Err(ArcadeError::InvalidConfig(
                "event_log_capacity must be positive".into(),
            ));
        }
        for (name, table) in [
            ("battleships_par", &self.battleships_par),
            ("memory_par", &self.memory_par),
        ] {
            if table.windows(2).any(|w| w[0].max_turns >= w[1].max_turns) {
                return Err(ArcadeError::InvalidConfig(format!(
                    "{} thresholds must be strictly increasing",
                    name
                )));
            }
        }
        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("streak_threshold = 4\n").unwrap();
        assert_eq!(config.streak_threshold, 4);
        assert_eq!(config.placement_attempts, 100);
        assert_eq!(config.battleships_par.len(), 3);
    }

    #[test]
    fn test_par_table_from_toml() {
        let content = r#"
            [[battleships_par]]
            max_turns = 20
            stars = 3
            label = "Legend"

            [[battleships_par]]
            max_turns = 40
            stars = 1
            label = "Sailor"
        "#;
        let config = EngineConfig::from_toml_str(content).unwrap();
        assert_eq!(config.battleships_par[0].label, "Legend");
        assert_eq!(config.battleships_par[1].max_turns, 40);
    }

    #[test]
    fn test_unordered_par_table_rejected() {
        let mut config = EngineConfig::default();
        config.battleships_par.swap(0, 1);
        assert!(matches!(
            config.validate(),
            Err(ArcadeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(
            EngineConfig::from_toml_str("streak_threshold = \"three\""),
            Err(ArcadeError::TomlError(_))
        ));
    }
}
