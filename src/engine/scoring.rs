//! End-of-game rating against a par table

use crate::core::config::ParTier;
use serde::{Deserialize, Serialize};

/// Discrete rating tier shown on the end screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub stars: u8,
    pub label: String,
}

/// Rate `turns` against `table` (best tier first).
///
/// The first tier whose `max_turns` is not exceeded wins; anything slower
/// than every tier gets zero stars and `unrated_label`.
pub fn rate(turns: u32, table: &[ParTier], unrated_label: &str) -> Rating {
    table
        .iter()
        .find(|tier| turns <= tier.max_turns)
        .map(|tier| Rating {
            stars: tier.stars,
            label: tier.label.clone(),
        })
        .unwrap_or_else(|| Rating {
            stars: 0,
            label: unrated_label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;

    #[test]
    fn test_fewer_turns_rate_higher() {
        let config = EngineConfig::default();
        let table = &config.battleships_par;
        assert_eq!(rate(12, table, "Cadet").stars, 3);
        assert_eq!(rate(30, table, "Cadet").stars, 3);
        assert_eq!(rate(31, table, "Cadet").stars, 2);
        assert_eq!(rate(60, table, "Cadet").label, "Ensign");
    }

    #[test]
    fn test_slower_than_every_tier() {
        let config = EngineConfig::default();
        let rating = rate(61, &config.battleships_par, &config.unrated_label);
        assert_eq!(rating, Rating { stars: 0, label: "Cadet".into() });
    }

    #[test]
    fn test_empty_table_is_unrated() {
        assert_eq!(rate(1, &[], "n/a").stars, 0);
    }
}
