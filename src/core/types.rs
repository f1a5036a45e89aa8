//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical time in milliseconds, advanced by the caller
pub type Millis = u64;

/// Maximum length of a sanitized instance identifier
const MAX_INSTANCE_ID_LEN: usize = 64;

/// Collision-safe identifier for one rendered game instance.
///
/// Only ASCII alphanumerics and `_` survive sanitizing, and the id never
/// starts with a digit, so it is usable verbatim as a DOM id, a CSS
/// selector fragment and a registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    /// Sanitize a raw activity identifier into an instance id
    ///
    /// Returns None when nothing usable is left (empty or all separators).
    pub fn sanitize(raw: &str) -> Option<Self> {
        let mut out = String::with_capacity(raw.len().min(MAX_INSTANCE_ID_LEN));
        for ch in raw.trim().chars() {
            if out.len() >= MAX_INSTANCE_ID_LEN {
                break;
            }
            if ch.is_ascii_alphanumeric() {
                out.push(ch);
            } else if !out.ends_with('_') {
                out.push('_');
            }
        }
        let trimmed = out.trim_matches('_');
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            Some(Self(format!("g_{}", trimmed)))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Fresh random id for activities that carry none
    pub fn generate() -> Self {
        Self(format!("g_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grid coordinate (row-major, zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// Step `dist` cells right (horizontal) or down (vertical)
    pub fn step(self, horizontal: bool, dist: usize) -> Self {
        if horizontal {
            Self::new(self.row, self.col + dist)
        } else {
            Self::new(self.row + dist, self.col)
        }
    }

    /// Orthogonal neighbours that lie inside a `size`×`size` grid.
    ///
    /// Order is up, down, left, right.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = self;
        [
            row.checked_sub(1).map(|r| Coord::new(r, col)),
            Some(Coord::new(row + 1, col)),
            col.checked_sub(1).map(|c| Coord::new(row, c)),
            Some(Coord::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
        .filter(move |c| c.in_bounds(size))
    }
}

impl From<(usize, usize)> for Coord {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Game variants the framework knows how to build
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    Battleships,
    MemoryMatch,
    /// A variant this build does not ship an engine for
    Other(String),
}

impl GameType {
    /// Parse an activity's `gameType` string, tolerating the usual spellings
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "battleships" | "battleship" | "gridcombat" => GameType::Battleships,
            "memory" | "memorymatch" | "memorymatching" | "matching" => GameType::MemoryMatch,
            _ => GameType::Other(raw.trim().to_string()),
        }
    }

    /// Short tag used to namespace DOM ids and class names
    pub fn tag(&self) -> &str {
        match self {
            GameType::Battleships => "bs",
            GameType::MemoryMatch => "mm",
            GameType::Other(_) => "game",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GameType::Battleships => "battleships",
            GameType::MemoryMatch => "memory-match",
            GameType::Other(name) => name,
        }
    }
}
