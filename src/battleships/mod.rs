//! Grid-combat game: sink the opponent's fleet before it sinks yours
//!
//! The worked exemplar of the engine framework. Direct torpedo shots are
//! always available; the area barrage is quiz-gated. Three consecutive
//! torpedo hits briefly reveal one hidden enemy ship cell.

pub mod ai;
pub mod board;
pub mod game;
pub mod session;

pub use ai::{AiMode, HuntTargetAi};
pub use board::{Board, Cell, Grid, Placement, Ship, ShipId, ShotOutcome};
pub use game::{BattleTimer, BattleshipsGame, FireResponse, GateOutcome};
pub use session::{BattleEvent, GameSession, Phase, Reveal, ShotStats, Side, Weapon};
