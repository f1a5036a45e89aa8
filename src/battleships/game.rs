//! Battleships engine: turn arbitration, quiz-gated barrage, streak reveal
//!
//! Flow of one round:
//! 1. Player fires a torpedo, or aims a barrage and answers a question
//! 2. Input locks for `player_settle_ms`, then the opponent fires once
//! 3. Input stays locked for `opponent_think_ms`, then control returns
//!
//! Any shot that sinks the last opposing ship ends the game immediately.

use crate::activity::extract::{BattleshipsSettings, GameConfig, GameSettings};
use crate::activity::question::{Question, QuestionPool};
use crate::battleships::board::{ShipId, ShotOutcome};
use crate::battleships::session::{BattleEvent, GameSession, Phase, Reveal, Side, Weapon};
use crate::core::config::EngineConfig;
use crate::core::types::{Coord, GameType, InstanceId, Millis};
use crate::engine::{
    rate, Accuracy, CompletionLatch, CompletionSink, MiniGame, PendingQuiz, TimerQueue,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Transitions waiting on the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleTimer {
    OpponentMove,
    PlayerResume,
    RevealExpired,
}

/// What happened when the player fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireResponse {
    /// Wrong phase, locked, or an invalid target; the turn is not used
    Ignored,
    Shot(ShotOutcome),
    /// A barrage is aimed and this question must be answered first
    AwaitingAnswer(Question),
}

/// Effect applied when a quiz gate is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Barrage { hits: u32, sunk: Vec<ShipId> },
    Forfeited,
}

pub struct BattleshipsGame {
    instance_id: InstanceId,
    settings: BattleshipsSettings,
    engine: EngineConfig,
    questions: QuestionPool,
    rng: ChaCha8Rng,
    timers: TimerQueue<BattleTimer>,
    session: GameSession,
    completion: CompletionLatch,
    sink: Box<dyn CompletionSink>,
}

impl fmt::Debug for BattleshipsGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleshipsGame")
            .field("instance_id", &self.instance_id)
            .field("settings", &self.settings)
            .field("phase", &self.session.phase)
            .field("generation", &self.session.generation)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

impl BattleshipsGame {
    pub fn new(
        instance_id: InstanceId,
        settings: BattleshipsSettings,
        questions: Vec<Question>,
        engine: EngineConfig,
        seed: Option<u64>,
        sink: Box<dyn CompletionSink>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let session = GameSession::new(
            1,
            settings.grid_size,
            &settings.ship_sizes,
            &engine,
            &mut rng,
        );
        tracing::debug!(
            instance = %instance_id,
            grid = settings.grid_size,
            ships = settings.ship_sizes.len(),
            "Battleships session created"
        );
        Self {
            instance_id,
            settings,
            engine,
            questions: QuestionPool::new(questions),
            rng,
            timers: TimerQueue::new(),
            session,
            completion: CompletionLatch::default(),
            sink,
        }
    }

    /// Build from extracted config; None if the config is for another game
    pub fn from_config(
        instance_id: InstanceId,
        config: &GameConfig,
        engine: EngineConfig,
        sink: Box<dyn CompletionSink>,
    ) -> Option<Self> {
        match &config.settings {
            GameSettings::Battleships(settings) => Some(Self::new(
                instance_id,
                settings.clone(),
                config.questions.clone(),
                engine,
                config.seed,
                sink,
            )),
            _ => None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &BattleshipsSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    pub fn pending_question(&self) -> Option<&PendingQuiz<Coord>> {
        self.session.quiz.pending()
    }

    pub fn accuracy(&self) -> Accuracy {
        self.session.quiz.accuracy()
    }

    /// Time until the next scheduled transition, if one is pending
    pub fn next_transition_in(&self) -> Option<Millis> {
        self.timers
            .next_due()
            .map(|due| due.saturating_sub(self.timers.now()))
    }

    pub fn completion_signaled(&self) -> bool {
        self.completion.is_signaled()
    }

    fn log(&mut self, event: BattleEvent) {
        tracing::debug!(instance = %self.instance_id, ?event, "battle event");
        self.session.events.push(self.timers.now(), event);
    }

    fn schedule(&mut self, delay: Millis, timer: BattleTimer) {
        self.timers.schedule(delay, self.session.generation, timer);
    }

    // === DEPLOYMENT ===

    /// Move one of the player's ships; only before the battle starts
    pub fn move_ship(&mut self, ship: ShipId, origin: Coord, horizontal: bool) -> bool {
        if self.session.phase != Phase::Deployment {
            return false;
        }
        self.session.player.try_place(ship, origin, horizontal)
    }

    /// Flip a placed ship's orientation around its origin
    pub fn rotate_ship(&mut self, ship: ShipId) -> bool {
        if self.session.phase != Phase::Deployment {
            return false;
        }
        let Some(placement) = self.session.player.ship(ship).and_then(|s| s.placement) else {
            return false;
        };
        self.session
            .player
            .try_place(ship, placement.origin, !placement.horizontal)
    }

    /// Re-roll the player's fleet. Returns how many ships did not fit.
    pub fn randomize_fleet(&mut self) -> Option<usize> {
        if self.session.phase != Phase::Deployment {
            return None;
        }
        Some(
            self.session
                .player
                .auto_place(&mut self.rng, self.engine.placement_attempts),
        )
    }

    /// Leave deployment and hand the first turn to the player
    pub fn begin_battle(&mut self) -> bool {
        if self.session.phase != Phase::Deployment {
            return false;
        }
        self.session.phase = Phase::PlayerTurn;
        self.log(BattleEvent::BattleStarted);
        true
    }

    // === PLAYER TURN ===

    pub fn select_weapon(&mut self, weapon: Weapon) -> bool {
        if self.session.phase != Phase::PlayerTurn || self.session.locked {
            return false;
        }
        self.session.weapon = weapon;
        true
    }

    /// Fire the selected weapon at `target` on the opponent's grid
    pub fn fire(&mut self, target: Coord) -> FireResponse {
        if self.session.phase != Phase::PlayerTurn || self.session.locked {
            return FireResponse::Ignored;
        }
        match self.session.weapon {
            Weapon::Torpedo => self.fire_torpedo(target),
            Weapon::Barrage => self.aim_barrage(target),
        }
    }

    fn fire_torpedo(&mut self, target: Coord) -> FireResponse {
        let outcome = self.session.opponent.fire_at(target);
        if !outcome.consumed() {
            return FireResponse::Ignored;
        }

        let stats = &mut self.session.player_stats;
        stats.turns += 1;
        stats.shots_fired += 1;
        if outcome.is_hit() {
            stats.hits += 1;
        }
        self.log(BattleEvent::ShotFired {
            by: Side::Player,
            target,
            outcome,
        });

        if outcome.is_hit() {
            if self.session.streak.record_success() {
                self.start_reveal();
            }
        } else {
            self.session.streak.reset();
        }

        self.after_player_action();
        FireResponse::Shot(outcome)
    }

    fn aim_barrage(&mut self, target: Coord) -> FireResponse {
        let area = self.session.opponent.area(target, self.engine.area_radius);
        let grid = self.session.opponent.grid();
        if area.iter().all(|&c| grid.is_hit(c)) {
            return FireResponse::Ignored;
        }

        let question = self.questions.draw();
        self.session.quiz.open(question.clone(), target);
        self.session.phase = Phase::QuizGate;
        self.log(BattleEvent::QuizOpened {
            question_id: question.id.clone(),
            target,
        });
        FireResponse::AwaitingAnswer(question)
    }

    /// Choose an answer for the open question; Some(correct) if recorded
    pub fn answer(&mut self, index: usize) -> Option<bool> {
        if self.session.phase != Phase::QuizGate {
            return None;
        }
        let correct = self.session.quiz.answer(index)?;
        self.log(BattleEvent::QuizAnswered { correct });
        Some(correct)
    }

    /// Apply the answered question's consequence. A second call is a no-op.
    pub fn confirm(&mut self) -> Option<GateOutcome> {
        if self.session.phase != Phase::QuizGate {
            return None;
        }
        let resolution = self.session.quiz.confirm()?;
        self.session.player_stats.turns += 1;
        self.session.weapon = Weapon::Torpedo;

        let outcome = if resolution.correct {
            let center = resolution.payload;
            let mut hits = 0;
            let mut sunk = Vec::new();
            for at in self.session.opponent.area(center, self.engine.area_radius) {
                match self.session.opponent.fire_at(at) {
                    ShotOutcome::Hit(_) => hits += 1,
                    ShotOutcome::Sunk(id) => {
                        hits += 1;
                        sunk.push(id);
                    }
                    ShotOutcome::Miss | ShotOutcome::Ignored => {}
                }
            }
            let stats = &mut self.session.player_stats;
            stats.shots_fired += 1;
            stats.hits += hits;
            stats.area_uses += 1;
            self.log(BattleEvent::BarrageResolved {
                center,
                hits,
                sunk: sunk.clone(),
            });
            GateOutcome::Barrage { hits, sunk }
        } else {
            self.session.streak.reset();
            self.log(BattleEvent::TurnForfeited);
            GateOutcome::Forfeited
        };

        self.session.phase = Phase::PlayerTurn;
        self.after_player_action();
        Some(outcome)
    }

    /// Either end the game or lock input and queue the opponent's move
    fn after_player_action(&mut self) {
        if self.session.opponent.all_sunk() {
            self.finish(Side::Player);
            return;
        }
        self.session.locked = true;
        self.schedule(self.engine.player_settle_ms, BattleTimer::OpponentMove);
    }

    fn start_reveal(&mut self) {
        let cells = self.session.opponent.untouched_ship_cells();
        if cells.is_empty() {
            return;
        }
        let cell = cells[self.rng.gen_range(0..cells.len())];
        let until = self.timers.now() + self.engine.reveal_duration_ms;
        self.session.reveal = Some(Reveal { cell, until });
        self.schedule(self.engine.reveal_duration_ms, BattleTimer::RevealExpired);
        self.log(BattleEvent::StreakReveal { cell });
    }

    // === OPPONENT TURN ===

    fn opponent_move(&mut self) {
        if self.session.phase == Phase::GameOver {
            return;
        }
        self.session.phase = Phase::OpponentTurn;
        self.log(BattleEvent::TurnChanged { to: Side::Opponent });

        let session = &mut self.session;
        let choice = session.ai.choose_target(
            session.player.grid(),
            &mut self.rng,
            self.engine.hunt_attempts,
        );

        if let Some((target, mode)) = choice {
            let outcome = session.player.fire_at(target);
            session.ai.observe(session.player.grid(), target, outcome);
            let stats = &mut session.opponent_stats;
            stats.turns += 1;
            stats.shots_fired += 1;
            if outcome.is_hit() {
                stats.hits += 1;
            }
            self.log(BattleEvent::OpponentTargeted { mode });
            self.log(BattleEvent::ShotFired {
                by: Side::Opponent,
                target,
                outcome,
            });
            if self.session.player.all_sunk() {
                self.finish(Side::Opponent);
                return;
            }
        }

        self.schedule(self.engine.opponent_think_ms, BattleTimer::PlayerResume);
    }

    fn player_resume(&mut self) {
        if self.session.phase != Phase::OpponentTurn {
            return;
        }
        self.session.phase = Phase::PlayerTurn;
        self.session.locked = false;
        self.log(BattleEvent::TurnChanged { to: Side::Player });
    }

    fn expire_reveal(&mut self) {
        let now = self.timers.now();
        if self.session.reveal.is_some_and(|r| r.until <= now) {
            self.session.reveal = None;
            self.log(BattleEvent::RevealExpired);
        }
    }

    fn finish(&mut self, winner: Side) {
        let rating = (winner == Side::Player).then(|| {
            rate(
                self.session.player_stats.turns,
                &self.engine.battleships_par,
                &self.engine.unrated_label,
            )
        });
        self.session.phase = Phase::GameOver;
        self.session.locked = false;
        self.session.winner = Some(winner);
        self.session.rating = rating.clone();
        tracing::info!(
            instance = %self.instance_id,
            ?winner,
            turns = self.session.player_stats.turns,
            "Battleships game over"
        );
        self.log(BattleEvent::GameOver { winner, rating });

        if winner == Side::Player {
            self.completion.fire(self.sink.as_mut(), &self.instance_id);
        }
    }
}

impl MiniGame for BattleshipsGame {
    fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    fn game_type(&self) -> GameType {
        GameType::Battleships
    }

    fn advance(&mut self, elapsed: Millis) {
        let until = self.timers.now() + elapsed;
        while let Some(scheduled) = self.timers.pop_due(until) {
            if scheduled.generation != self.session.generation {
                tracing::trace!(event = ?scheduled.event, "Dropping timer from a previous session");
                continue;
            }
            match scheduled.event {
                BattleTimer::OpponentMove => self.opponent_move(),
                BattleTimer::PlayerResume => self.player_resume(),
                BattleTimer::RevealExpired => self.expire_reveal(),
            }
        }
        self.timers.settle(until);
    }

    fn restart(&mut self) {
        let generation = self.session.generation + 1;
        self.session = GameSession::new(
            generation,
            self.settings.grid_size,
            &self.settings.ship_sizes,
            &self.engine,
            &mut self.rng,
        );
        tracing::debug!(instance = %self.instance_id, generation, "Battleships restarted");
    }

    fn is_locked(&self) -> bool {
        self.session.locked
    }

    fn is_over(&self) -> bool {
        self.session.phase == Phase::GameOver
    }

    fn is_won(&self) -> bool {
        self.session.winner == Some(Side::Player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NoopSink;

    fn game(seed: u64) -> BattleshipsGame {
        BattleshipsGame::new(
            InstanceId::sanitize("unit").unwrap(),
            BattleshipsSettings::default(),
            vec![Question::new("q1", "1 + 1?", &["2", "3"], 0)],
            EngineConfig::default(),
            Some(seed),
            Box::new(NoopSink),
        )
    }

    fn empty_opponent_cell(game: &BattleshipsGame) -> Coord {
        let grid = game.session().opponent.grid();
        grid.coords()
            .find(|&c| !grid.cell(c).unwrap().occupied() && !grid.is_hit(c))
            .unwrap()
    }

    #[test]
    fn test_cannot_fire_during_deployment() {
        let mut game = game(1);
        assert_eq!(game.fire(Coord::new(0, 0)), FireResponse::Ignored);
        assert!(game.begin_battle());
        assert!(!game.begin_battle());
        assert_eq!(game.phase(), Phase::PlayerTurn);
    }

    #[test]
    fn test_miss_locks_until_opponent_has_moved() {
        let mut game = game(2);
        game.begin_battle();
        let target = empty_opponent_cell(&game);
        assert_eq!(game.fire(target), FireResponse::Shot(ShotOutcome::Miss));
        assert!(game.is_locked());
        assert_eq!(game.fire(Coord::new(0, 0)), FireResponse::Ignored);

        game.advance(899);
        assert_eq!(game.phase(), Phase::PlayerTurn);
        game.advance(1);
        assert_eq!(game.phase(), Phase::OpponentTurn);
        assert_eq!(game.session().opponent_stats.shots_fired, 1);
        assert!(game.is_locked());

        game.advance(1100);
        assert_eq!(game.phase(), Phase::PlayerTurn);
        assert!(!game.is_locked());
    }

    #[test]
    fn test_next_transition_tracks_turn_handover() {
        let mut game = game(9);
        game.begin_battle();
        assert_eq!(game.next_transition_in(), None);

        game.fire(empty_opponent_cell(&game));
        assert_eq!(game.next_transition_in(), Some(900));
        game.advance(400);
        assert_eq!(game.next_transition_in(), Some(500));
        game.advance(500);
        assert_eq!(game.next_transition_in(), Some(1100));
        game.advance(1100);
        assert_eq!(game.next_transition_in(), None);
        assert!(!game.is_locked());
    }

    #[test]
    fn test_repeat_target_does_not_consume_turn() {
        let mut game = game(3);
        game.begin_battle();
        let target = empty_opponent_cell(&game);
        game.fire(target);
        game.advance(5000);
        assert_eq!(game.fire(target), FireResponse::Ignored);
        assert!(!game.is_locked());
        assert_eq!(game.session().player_stats.turns, 1);
    }

    #[test]
    fn test_barrage_waits_for_answer_and_confirm() {
        let mut game = game(4);
        game.begin_battle();
        assert!(game.select_weapon(Weapon::Barrage));
        let response = game.fire(Coord::new(3, 3));
        assert!(matches!(response, FireResponse::AwaitingAnswer(ref q) if q.id == "q1"));
        assert_eq!(game.phase(), Phase::QuizGate);
        assert!(game.confirm().is_none());

        assert_eq!(game.answer(0), Some(true));
        assert_eq!(game.answer(1), None);
        assert!(matches!(game.confirm(), Some(GateOutcome::Barrage { .. })));
        assert!(game.confirm().is_none());

        let grid = game.session().opponent.grid();
        assert!(game.session().opponent.area(Coord::new(3, 3), 1).iter().all(|&c| grid.is_hit(c)));
        assert_eq!(game.session().player_stats.area_uses, 1);
        assert_eq!(game.session().weapon, Weapon::Torpedo);
        assert!(game.is_locked());
    }

    #[test]
    fn test_wrong_answer_forfeits_and_resets_streak() {
        let mut game = game(5);
        game.begin_battle();
        let ship_cell = game.session().opponent.ship(0).unwrap().cells()[0];
        game.fire(ship_cell);
        assert_eq!(game.session().streak.count(), 1);
        game.advance(5000);

        game.select_weapon(Weapon::Barrage);
        game.fire(Coord::new(0, 0));
        assert_eq!(game.answer(1), Some(false));
        assert_eq!(game.confirm(), Some(GateOutcome::Forfeited));
        assert_eq!(game.session().streak.count(), 0);
        assert_eq!(game.accuracy().total, 1);
        assert_eq!(game.session().player_stats.turns, 2);
    }

    #[test]
    fn test_restart_discards_pending_transitions() {
        let mut game = game(6);
        game.begin_battle();
        let target = empty_opponent_cell(&game);
        game.fire(target);
        game.restart();
        assert_eq!(game.phase(), Phase::Deployment);
        game.advance(10_000);
        assert_eq!(game.phase(), Phase::Deployment);
        assert_eq!(game.session().opponent_stats.shots_fired, 0);
        assert_eq!(game.session().generation, 2);
    }

    #[test]
    fn test_deployment_moves_and_rotates() {
        let mut game = game(7);
        assert_eq!(game.randomize_fleet(), Some(0));
        let board = &game.session().player;
        let free = board
            .grid()
            .coords()
            .find(|&c| {
                c != board.ship(3).unwrap().placement.unwrap().origin
                    && board.can_place(c, 2, true, Some(3))
            })
            .unwrap();
        assert!(game.move_ship(3, free, true));
        assert_eq!(game.session().player.ship(3).unwrap().placement.unwrap().origin, free);

        game.begin_battle();
        assert!(!game.move_ship(3, free, false));
        assert!(!game.rotate_ship(3));
        assert!(game.randomize_fleet().is_none());
    }
}
