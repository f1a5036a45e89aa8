//! Best-effort extraction of typed game configuration from activity records
//!
//! Activity records come from the authoring tool as loosely shaped JSON.
//! Nothing here fails on a missing or malformed field: every value has a
//! documented default and bad values are clamped or dropped.

use crate::activity::question::Question;
use crate::core::error::Result;
use crate::core::types::GameType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_GRID_SIZE: usize = 8;
pub const MIN_GRID_SIZE: usize = 6;
pub const MAX_GRID_SIZE: usize = 15;
pub const DEFAULT_SHIP_COUNT: usize = 4;
pub const MAX_SHIP_COUNT: usize = 8;
/// Largest ship in a generated fleet; sizes descend from here to a floor of 2
pub const LARGEST_SHIP: usize = 5;
pub const SMALLEST_SHIP: usize = 2;

pub const DEFAULT_PAIR_COUNT: usize = 6;
pub const MIN_PAIR_COUNT: usize = 2;
pub const MAX_PAIR_COUNT: usize = 12;

const PAIR_SYMBOLS: [&str; 12] = [
    "◆", "●", "▲", "■", "★", "♥", "♣", "♠", "☀", "☂", "☘", "✿",
];

/// The opaque record the host hands us for one embedded game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Option<String>,
    pub game_type: GameType,
    pub config: Value,
}

impl ActivityRecord {
    pub fn new(id: &str, game_type: GameType, config: Value) -> Self {
        Self {
            id: Some(id.to_string()),
            game_type,
            config,
        }
    }

    /// Read a record out of an arbitrary JSON value
    pub fn from_value(value: &Value) -> Self {
        let id = ["id", "activityId", "activity_id"]
            .iter()
            .find_map(|k| match value.get(*k)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        let config = value
            .get("config")
            .filter(|c| c.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        let game_type = ["gameType", "game_type", "type"]
            .iter()
            .find_map(|k| value.get(*k).or_else(|| config.get(*k))?.as_str())
            .map(GameType::parse)
            .unwrap_or_else(|| GameType::Other(String::new()));

        Self {
            id,
            game_type,
            config,
        }
    }

    /// Parse a JSON document; only syntax errors are reported
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(&value))
    }
}

/// A memory-match card pair; `front` and `back` must be matched together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPair {
    pub front: String,
    pub back: String,
}

impl CardPair {
    pub fn new(front: &str, back: &str) -> Self {
        Self {
            front: front.to_string(),
            back: back.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleshipsSettings {
    pub grid_size: usize,
    /// Ship lengths, in fleet order
    pub ship_sizes: Vec<usize>,
}

impl Default for BattleshipsSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            ship_sizes: descending_fleet(DEFAULT_SHIP_COUNT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySettings {
    pub pairs: Vec<CardPair>,
    pub columns: usize,
}

/// Per-variant settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSettings {
    Battleships(BattleshipsSettings),
    MemoryMatch(MemorySettings),
    Unsupported,
}

/// Fully defaulted configuration for one game instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_type: GameType,
    /// Whether the host tracks this activity toward course completion
    pub required: bool,
    /// May be empty; the pool substitutes a fallback when drawn from
    pub questions: Vec<Question>,
    pub seed: Option<u64>,
    pub theme: Option<String>,
    pub settings: GameSettings,
}

/// Turn an activity record into a typed configuration
pub fn extract_config(record: &ActivityRecord) -> GameConfig {
    let config = &record.config;

    let questions: Vec<Question> = ["questions", "questionPool", "question_pool"]
        .iter()
        .find_map(|k| config.get(*k).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| Question::from_value(v, i))
                .collect()
        })
        .unwrap_or_default();

    let settings = match record.game_type {
        GameType::Battleships => GameSettings::Battleships(extract_battleships(config)),
        GameType::MemoryMatch => GameSettings::MemoryMatch(extract_memory(config, &questions)),
        GameType::Other(_) => GameSettings::Unsupported,
    };

    GameConfig {
        game_type: record.game_type.clone(),
        required: read_required(config),
        questions,
        seed: read_u64(config, &["seed"]),
        theme: config
            .get("theme")
            .and_then(Value::as_str)
            .map(String::from),
        settings,
    }
}

fn extract_battleships(config: &Value) -> BattleshipsSettings {
    let grid_size = read_u64(config, &["gridSize", "grid_size", "boardSize"])
        .map(|n| (n as usize).clamp(MIN_GRID_SIZE, MAX_GRID_SIZE))
        .unwrap_or(DEFAULT_GRID_SIZE);

    let explicit: Vec<usize> = config
        .get("shipSizes")
        .and_then(Value::as_array)
        .map(|sizes| {
            sizes
                .iter()
                .filter_map(Value::as_u64)
                .filter(|&s| s >= 1)
                .map(|s| (s as usize).min(grid_size))
                .take(MAX_SHIP_COUNT)
                .collect()
        })
        .unwrap_or_default();

    let ship_sizes = if explicit.is_empty() {
        let count = read_u64(config, &["shipCount", "ship_count", "ships"])
            .map(|n| (n as usize).clamp(1, MAX_SHIP_COUNT))
            .unwrap_or(DEFAULT_SHIP_COUNT);
        descending_fleet(count)
            .into_iter()
            .map(|s| s.min(grid_size))
            .collect()
    } else {
        explicit
    };

    BattleshipsSettings {
        grid_size,
        ship_sizes,
    }
}

/// Fleet of `count` ships with sizes 5, 4, 3, 2, 2, ...
pub fn descending_fleet(count: usize) -> Vec<usize> {
    (0..count)
        .map(|i| LARGEST_SHIP.saturating_sub(i).max(SMALLEST_SHIP))
        .collect()
}

fn extract_memory(config: &Value, questions: &[Question]) -> MemorySettings {
    let pair_count = read_u64(config, &["pairCount", "pair_count", "pairs"])
        .map(|n| (n as usize).clamp(MIN_PAIR_COUNT, MAX_PAIR_COUNT))
        .unwrap_or(DEFAULT_PAIR_COUNT);

    let mut pairs: Vec<CardPair> = config
        .get("pairs")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_pair).collect())
        .unwrap_or_default();

    let target = if pairs.is_empty() {
        pair_count
    } else {
        MIN_PAIR_COUNT
    };
    if pairs.is_empty() {
        pairs = questions
            .iter()
            .take(pair_count)
            .map(|q| CardPair::new(&q.prompt, q.correct_answer()))
            .collect();
    }
    pairs.truncate(MAX_PAIR_COUNT);

    let mut symbols = PAIR_SYMBOLS.iter();
    while pairs.len() < target {
        match symbols.next() {
            Some(symbol) => pairs.push(CardPair::new(symbol, symbol)),
            None => break,
        }
    }

    let columns = read_u64(config, &["columns", "cols"])
        .map(|n| (n as usize).clamp(2, 8))
        .unwrap_or(4);

    MemorySettings { pairs, columns }
}

fn parse_pair(value: &Value) -> Option<CardPair> {
    match value {
        Value::Array(items) if items.len() >= 2 => Some(CardPair::new(
            items[0].as_str()?,
            items[1].as_str()?,
        )),
        Value::Object(_) => {
            let front = ["front", "term", "left"]
                .iter()
                .find_map(|k| value.get(*k).and_then(Value::as_str))?;
            let back = ["back", "definition", "right"]
                .iter()
                .find_map(|k| value.get(*k).and_then(Value::as_str))?;
            Some(CardPair::new(front, back))
        }
        _ => None,
    }
}

fn read_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Whether the host tracks the activity; absent or unreadable means no
pub(crate) fn read_required(config: &Value) -> bool {
    read_bool(config, &["required", "isRequired"]).unwrap_or(false)
}

fn read_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| match value.get(*k)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        Value::String(s) => match s.trim() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn battleships(config: Value) -> BattleshipsSettings {
        let record = ActivityRecord::new("a", GameType::Battleships, config);
        match extract_config(&record).settings {
            GameSettings::Battleships(s) => s,
            other => panic!("unexpected settings {:?}", other),
        }
    }

    #[test]
    fn test_empty_config_gets_defaults() {
        let settings = battleships(json!({}));
        assert_eq!(settings.grid_size, 8);
        assert_eq!(settings.ship_sizes, vec![5, 4, 3, 2]);
    }

    #[test]
    fn test_ship_count_builds_descending_fleet() {
        let settings = battleships(json!({ "shipCount": 6, "gridSize": 10 }));
        assert_eq!(settings.ship_sizes, vec![5, 4, 3, 2, 2, 2]);
        assert_eq!(settings.grid_size, 10);
    }

    #[test]
    fn test_grid_size_is_clamped() {
        assert_eq!(battleships(json!({ "gridSize": 3 })).grid_size, 6);
        assert_eq!(battleships(json!({ "gridSize": 99 })).grid_size, 15);
        assert_eq!(battleships(json!({ "gridSize": "9" })).grid_size, 9);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let settings = battleships(json!({ "gridSize": "huge", "shipCount": null }));
        assert_eq!(settings, BattleshipsSettings::default());
    }

    #[test]
    fn test_empty_question_list_is_kept_empty() {
        let record = ActivityRecord::new("a", GameType::Battleships, json!({ "questions": [] }));
        let config = extract_config(&record);
        assert!(config.questions.is_empty());
        assert!(!config.required);
    }

    #[test]
    fn test_record_from_value_reads_nested_type() {
        let record = ActivityRecord::from_value(&json!({
            "id": 12,
            "config": { "gameType": "memory", "required": true }
        }));
        assert_eq!(record.id.as_deref(), Some("12"));
        assert_eq!(record.game_type, GameType::MemoryMatch);
        assert!(extract_config(&record).required);
    }

    #[test]
    fn test_memory_pairs_from_questions_then_symbols() {
        let record = ActivityRecord::new(
            "m",
            GameType::MemoryMatch,
            json!({
                "pairCount": 3,
                "questions": [{ "prompt": "H2O", "answers": ["Water", "Salt"], "correctIndex": 0 }]
            }),
        );
        let GameSettings::MemoryMatch(settings) = extract_config(&record).settings else {
            panic!("expected memory settings");
        };
        assert_eq!(settings.pairs.len(), 3);
        assert_eq!(settings.pairs[0], CardPair::new("H2O", "Water"));
        assert_eq!(settings.pairs[1].front, settings.pairs[1].back);
    }

    #[test]
    fn test_unknown_game_is_unsupported() {
        let record = ActivityRecord::from_value(&json!({ "gameType": "word-search" }));
        assert_eq!(extract_config(&record).settings, GameSettings::Unsupported);
    }
}
