//! The complete mutable state of one Battleships playthrough

use crate::battleships::ai::{AiMode, HuntTargetAi};
use crate::battleships::board::{Board, ShipId, ShotOutcome};
use crate::core::config::EngineConfig;
use crate::core::types::{Coord, Millis};
use crate::engine::{EventLog, QuizGate, Rating, Streak};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Turn state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Player arranges their fleet before the first shot
    #[default]
    Deployment,
    PlayerTurn,
    OpponentTurn,
    /// An area shot is waiting on a question
    QuizGate,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    /// Single cell, always available
    #[default]
    Torpedo,
    /// Square area around the target, gated behind a question
    Barrage,
}

/// Per-side shot counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotStats {
    /// Turns taken, including forfeited ones
    pub turns: u32,
    pub shots_fired: u32,
    /// Cells hit (a barrage can hit several)
    pub hits: u32,
    pub area_uses: u32,
}

/// Highlighted opponent cell from a streak bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub cell: Coord,
    pub until: Millis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    BattleStarted,
    ShotFired {
        by: Side,
        target: Coord,
        outcome: ShotOutcome,
    },
    OpponentTargeted {
        mode: AiMode,
    },
    QuizOpened {
        question_id: String,
        target: Coord,
    },
    QuizAnswered {
        correct: bool,
    },
    BarrageResolved {
        center: Coord,
        hits: u32,
        sunk: Vec<ShipId>,
    },
    TurnForfeited,
    StreakReveal {
        cell: Coord,
    },
    RevealExpired,
    TurnChanged {
        to: Side,
    },
    GameOver {
        winner: Side,
        /// Only a player win is rated
        rating: Option<Rating>,
    },
}

/// Everything one playthrough mutates.
///
/// Created on start, replaced wholesale on restart; `generation` tells
/// late timer callbacks whether they still belong to this session.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub generation: u64,
    pub player: Board,
    pub opponent: Board,
    pub phase: Phase,
    /// Set while a scheduled transition is pending
    pub locked: bool,
    pub winner: Option<Side>,
    pub weapon: Weapon,
    pub streak: Streak,
    pub player_stats: ShotStats,
    pub opponent_stats: ShotStats,
    pub quiz: QuizGate<Coord>,
    pub ai: HuntTargetAi,
    pub reveal: Option<Reveal>,
    pub events: EventLog<BattleEvent>,
    pub rating: Option<Rating>,
}

impl GameSession {
    /// Fresh session with both fleets placed at random
    pub fn new<R: Rng + ?Sized>(
        generation: u64,
        grid_size: usize,
        ship_sizes: &[usize],
        engine: &EngineConfig,
        rng: &mut R,
    ) -> Self {
        let mut player = Board::new(grid_size, ship_sizes);
        let mut opponent = Board::new(grid_size, ship_sizes);
        player.auto_place(rng, engine.placement_attempts);
        opponent.auto_place(rng, engine.placement_attempts);

        Self {
            generation,
            player,
            opponent,
            phase: Phase::Deployment,
            locked: false,
            winner: None,
            weapon: Weapon::Torpedo,
            streak: Streak::new(engine.streak_threshold),
            player_stats: ShotStats::default(),
            opponent_stats: ShotStats::default(),
            quiz: QuizGate::new(),
            ai: HuntTargetAi::new(),
            reveal: None,
            events: EventLog::new(engine.event_log_capacity),
            rating: None,
        }
    }

    pub fn board(&self, side: Side) -> &Board {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }
}
