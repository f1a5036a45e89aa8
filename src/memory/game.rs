//! Memory-match engine
//!
//! Cards come in pairs (term and definition, or two identical symbols).
//! Flipping two cards counts one move. A mismatch stays face up for
//! `flip_back_ms` with input locked. The quiz-gated peek shows every card
//! for `reveal_duration_ms`; a wrong answer costs `peek_penalty_moves`.

use crate::activity::extract::{CardPair, GameConfig, GameSettings, MemorySettings};
use crate::activity::question::{Question, QuestionPool};
use crate::core::config::EngineConfig;
use crate::core::types::{GameType, InstanceId, Millis};
use crate::engine::{
    rate, Accuracy, CompletionLatch, CompletionSink, EventLog, MiniGame, QuizGate, Rating,
    Streak, TimerQueue,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    FaceUp,
    Matched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Index of the pair this card belongs to
    pub pair: usize,
    pub label: String,
    pub state: CardState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPhase {
    #[default]
    Playing,
    QuizGate,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTimer {
    FlipBack,
    PeekEnd,
    HintEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipResponse {
    Ignored,
    FirstCard,
    Matched { pair: usize },
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryEvent {
    CardFlipped { index: usize },
    PairMatched { pair: usize },
    Mismatch { first: usize, second: usize },
    FlippedBack,
    QuizOpened { question_id: String },
    QuizAnswered { correct: bool },
    PeekStarted,
    PeekEnded,
    PeekFailed { penalty: u32 },
    StreakHint { index: usize },
    HintExpired,
    Completed { moves: u32, rating: Rating },
}

/// One memory-match playthrough
#[derive(Debug, Clone)]
pub struct MemorySession {
    pub generation: u64,
    pub cards: Vec<Card>,
    pub phase: MemoryPhase,
    pub locked: bool,
    pub first_pick: Option<usize>,
    pub mismatch: Option<(usize, usize)>,
    pub moves: u32,
    pub matches: u32,
    pub streak: Streak,
    pub quiz: QuizGate<()>,
    /// Every card is shown while a peek is running
    pub peeking: bool,
    /// Card highlighted by a streak bonus
    pub hint: Option<usize>,
    pub events: EventLog<MemoryEvent>,
    pub rating: Option<Rating>,
}

impl MemorySession {
    fn new<R: Rng + ?Sized>(
        generation: u64,
        pairs: &[CardPair],
        engine: &EngineConfig,
        rng: &mut R,
    ) -> Self {
        let mut cards: Vec<Card> = pairs
            .iter()
            .enumerate()
            .flat_map(|(pair, p)| {
                [
                    Card {
                        pair,
                        label: p.front.clone(),
                        state: CardState::Hidden,
                    },
                    Card {
                        pair,
                        label: p.back.clone(),
                        state: CardState::Hidden,
                    },
                ]
            })
            .collect();
        cards.shuffle(rng);

        Self {
            generation,
            cards,
            phase: MemoryPhase::Playing,
            locked: false,
            first_pick: None,
            mismatch: None,
            moves: 0,
            matches: 0,
            streak: Streak::new(engine.streak_threshold),
            quiz: QuizGate::new(),
            peeking: false,
            hint: None,
            events: EventLog::new(engine.event_log_capacity),
            rating: None,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Whether a card's label should currently be shown
    pub fn is_visible(&self, index: usize) -> bool {
        self.cards
            .get(index)
            .is_some_and(|c| c.state != CardState::Hidden || self.peeking)
    }
}

pub struct MemoryMatchGame {
    instance_id: InstanceId,
    settings: MemorySettings,
    engine: EngineConfig,
    questions: QuestionPool,
    rng: ChaCha8Rng,
    timers: TimerQueue<MemoryTimer>,
    session: MemorySession,
    completion: CompletionLatch,
    sink: Box<dyn CompletionSink>,
}

impl fmt::Debug for MemoryMatchGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryMatchGame")
            .field("instance_id", &self.instance_id)
            .field("pairs", &self.settings.pairs.len())
            .field("phase", &self.session.phase)
            .field("generation", &self.session.generation)
            .finish_non_exhaustive()
    }
}

impl MemoryMatchGame {
    pub fn new(
        instance_id: InstanceId,
        settings: MemorySettings,
        questions: Vec<Question>,
        engine: EngineConfig,
        seed: Option<u64>,
        sink: Box<dyn CompletionSink>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let session = MemorySession::new(1, &settings.pairs, &engine, &mut rng);
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

    pub fn from_config(
        instance_id: InstanceId,
        config: &GameConfig,
        engine: EngineConfig,
        sink: Box<dyn CompletionSink>,
    ) -> Option<Self> {
        match &config.settings {
            GameSettings::MemoryMatch(settings) => Some(Self::new(
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

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    pub fn accuracy(&self) -> Accuracy {
        self.session.quiz.accuracy()
    }

    pub fn completion_signaled(&self) -> bool {
        self.completion.is_signaled()
    }

    fn log(&mut self, event: MemoryEvent) {
        tracing::debug!(instance = %self.instance_id, ?event, "memory event");
        self.session.events.push(self.timers.now(), event);
    }

    fn schedule(&mut self, delay: Millis, timer: MemoryTimer) {
        self.timers.schedule(delay, self.session.generation, timer);
    }

    fn accepts_input(&self) -> bool {
        self.session.phase == MemoryPhase::Playing && !self.session.locked
    }

    /// Turn a hidden card face up
    pub fn flip(&mut self, index: usize) -> FlipResponse {
        if !self.accepts_input() {
            return FlipResponse::Ignored;
        }
        match self.session.cards.get(index) {
            Some(card) if card.state == CardState::Hidden => {}
            _ => return FlipResponse::Ignored,
        }
        self.session.cards[index].state = CardState::FaceUp;
        self.log(MemoryEvent::CardFlipped { index });

        let Some(first) = self.session.first_pick.take() else {
            self.session.first_pick = Some(index);
            return FlipResponse::FirstCard;
        };

        self.session.moves += 1;
        let pair = self.session.cards[first].pair;
        if pair == self.session.cards[index].pair {
            self.session.cards[first].state = CardState::Matched;
            self.session.cards[index].state = CardState::Matched;
            self.session.matches += 1;
            self.log(MemoryEvent::PairMatched { pair });

            if self.session.matches as usize == self.session.pair_count() {
                self.finish();
            } else if self.session.streak.record_success() {
                self.start_hint();
            }
            FlipResponse::Matched { pair }
        } else {
            self.session.streak.reset();
            self.session.locked = true;
            self.session.mismatch = Some((first, index));
            self.log(MemoryEvent::Mismatch {
                first,
                second: index,
            });
            self.schedule(self.engine.flip_back_ms, MemoryTimer::FlipBack);
            FlipResponse::Mismatch
        }
    }

    /// Ask for a peek; answer the returned question to earn it.
    ///
    /// Only allowed between moves (no card half-flipped).
    pub fn request_peek(&mut self) -> Option<Question> {
        if !self.accepts_input() || self.session.first_pick.is_some() {
            return None;
        }
        let question = self.questions.draw();
        if !self.session.quiz.open(question.clone(), ()) {
            return None;
        }
        self.session.phase = MemoryPhase::QuizGate;
        self.log(MemoryEvent::QuizOpened {
            question_id: question.id.clone(),
        });
        Some(question)
    }

    pub fn answer(&mut self, index: usize) -> Option<bool> {
        if self.session.phase != MemoryPhase::QuizGate {
            return None;
        }
        let correct = self.session.quiz.answer(index)?;
        self.log(MemoryEvent::QuizAnswered { correct });
        Some(correct)
    }

    /// Apply the peek or the penalty. Returns whether the answer was correct.
    pub fn confirm(&mut self) -> Option<bool> {
        if self.session.phase != MemoryPhase::QuizGate {
            return None;
        }
        let resolution = self.session.quiz.confirm()?;
        self.session.phase = MemoryPhase::Playing;

        if resolution.correct {
            self.session.peeking = true;
            self.session.locked = true;
            self.log(MemoryEvent::PeekStarted);
            self.schedule(self.engine.reveal_duration_ms, MemoryTimer::PeekEnd);
        } else {
            let penalty = self.engine.peek_penalty_moves;
            self.session.moves += penalty;
            self.session.streak.reset();
            self.log(MemoryEvent::PeekFailed { penalty });
        }
        Some(resolution.correct)
    }

    fn start_hint(&mut self) {
        let hidden: Vec<usize> = self
            .session
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state == CardState::Hidden)
            .map(|(i, _)| i)
            .collect();
        if hidden.is_empty() {
            return;
        }
        let index = hidden[self.rng.gen_range(0..hidden.len())];
        self.session.hint = Some(index);
        self.log(MemoryEvent::StreakHint { index });
        self.schedule(self.engine.reveal_duration_ms, MemoryTimer::HintEnd);
    }

    fn flip_back(&mut self) {
        if let Some((a, b)) = self.session.mismatch.take() {
            for i in [a, b] {
                if self.session.cards[i].state == CardState::FaceUp {
                    self.session.cards[i].state = CardState::Hidden;
                }
            }
            self.log(MemoryEvent::FlippedBack);
        }
        self.session.locked = false;
    }

    fn end_peek(&mut self) {
        if self.session.peeking {
            self.session.peeking = false;
            self.session.locked = false;
            self.log(MemoryEvent::PeekEnded);
        }
    }

    fn end_hint(&mut self) {
        if self.session.hint.take().is_some() {
            self.log(MemoryEvent::HintExpired);
        }
    }

    fn finish(&mut self) {
        let moves = self.session.moves;
        let rating = rate(moves, &self.engine.memory_par, &self.engine.unrated_label);
        self.session.phase = MemoryPhase::GameOver;
        self.session.locked = false;
        self.session.hint = None;
        self.session.rating = Some(rating.clone());
        tracing::info!(instance = %self.instance_id, moves, "Memory match completed");
        self.log(MemoryEvent::Completed { moves, rating });
        self.completion.fire(self.sink.as_mut(), &self.instance_id);
    }
}

impl MiniGame for MemoryMatchGame {
    fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    fn game_type(&self) -> GameType {
        GameType::MemoryMatch
    }

    fn advance(&mut self, elapsed: Millis) {
        let until = self.timers.now() + elapsed;
        while let Some(scheduled) = self.timers.pop_due(until) {
            if scheduled.generation != self.session.generation {
                continue;
            }
            match scheduled.event {
                MemoryTimer::FlipBack => self.flip_back(),
                MemoryTimer::PeekEnd => self.end_peek(),
                MemoryTimer::HintEnd => self.end_hint(),
            }
        }
        self.timers.settle(until);
    }

    fn restart(&mut self) {
        let generation = self.session.generation + 1;
        self.session =
            MemorySession::new(generation, &self.settings.pairs, &self.engine, &mut self.rng);
    }

    fn is_locked(&self) -> bool {
        self.session.locked
    }

    fn is_over(&self) -> bool {
        self.session.phase == MemoryPhase::GameOver
    }

    fn is_won(&self) -> bool {
        self.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NoopSink;

    fn game() -> MemoryMatchGame {
        let settings = MemorySettings {
            pairs: vec![
                CardPair::new("H2O", "Water"),
                CardPair::new("NaCl", "Salt"),
                CardPair::new("CO2", "Carbon dioxide"),
            ],
            columns: 3,
        };
        MemoryMatchGame::new(
            InstanceId::sanitize("chem").unwrap(),
            settings,
            vec![Question::new("q", "Pick yes", &["yes", "no"], 0)],
            EngineConfig::default(),
            Some(11),
            Box::new(NoopSink),
        )
    }

    fn partner(game: &MemoryMatchGame, index: usize) -> usize {
        let pair = game.session().cards[index].pair;
        (0..game.session().cards.len())
            .find(|&i| i != index && game.session().cards[i].pair == pair)
            .unwrap()
    }

    fn non_partner(game: &MemoryMatchGame, index: usize) -> usize {
        let pair = game.session().cards[index].pair;
        (0..game.session().cards.len())
            .find(|&i| game.session().cards[i].pair != pair)
            .unwrap()
    }

    #[test]
    fn test_deck_has_two_cards_per_pair() {
        let game = game();
        assert_eq!(game.session().cards.len(), 6);
        for pair in 0..3 {
            assert_eq!(game.session().cards.iter().filter(|c| c.pair == pair).count(), 2);
        }
    }

    #[test]
    fn test_match_stays_face_up() {
        let mut game = game();
        let other = partner(&game, 0);
        assert_eq!(game.flip(0), FlipResponse::FirstCard);
        assert!(matches!(game.flip(other), FlipResponse::Matched { .. }));
        assert_eq!(game.session().cards[0].state, CardState::Matched);
        assert_eq!(game.session().moves, 1);
        assert_eq!(game.flip(0), FlipResponse::Ignored);
    }

    #[test]
    fn test_mismatch_locks_then_flips_back() {
        let mut game = game();
        let wrong = non_partner(&game, 0);
        game.flip(0);
        assert_eq!(game.flip(wrong), FlipResponse::Mismatch);
        assert!(game.is_locked());
        assert_eq!(game.flip(partner(&game, 0)), FlipResponse::Ignored);

        game.advance(1000);
        assert!(!game.is_locked());
        assert_eq!(game.session().cards[0].state, CardState::Hidden);
        assert_eq!(game.session().cards[wrong].state, CardState::Hidden);
    }

    #[test]
    fn test_peek_shows_everything_then_hides() {
        let mut game = game();
        assert!(game.request_peek().is_some());
        assert_eq!(game.flip(0), FlipResponse::Ignored);
        game.answer(0);
        assert_eq!(game.confirm(), Some(true));
        assert!(game.session().is_visible(3));
        assert!(game.is_locked());

        game.advance(2500);
        assert!(!game.session().is_visible(3));
        assert!(!game.is_locked());
    }

    #[test]
    fn test_failed_peek_costs_moves() {
        let mut game = game();
        game.request_peek();
        game.answer(1);
        assert_eq!(game.confirm(), Some(false));
        assert_eq!(game.confirm(), None);
        assert_eq!(game.session().moves, 2);
        assert_eq!(game.accuracy().correct, 0);
    }

    #[test]
    fn test_clearing_board_completes_once() {
        let mut game = game();
        while !game.is_over() {
            let next = (0..game.session().cards.len())
                .find(|&i| game.session().cards[i].state == CardState::Hidden)
                .unwrap();
            let other = partner(&game, next);
            game.flip(next);
            game.flip(other);
            game.advance(5000);
        }
        assert!(game.is_won());
        assert!(game.completion_signaled());
        assert_eq!(game.session().moves, 3);
        assert_eq!(game.session().rating.as_ref().unwrap().stars, 3);
    }
}
