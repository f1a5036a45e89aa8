//! Headless Autoplay
//!
//! Plays Battleships against the built-in opponent with a simulated student
//! and prints one JSON summary per game. Handy for tuning par tables.

use clap::Parser;
use quiz_arcade::activity::{BattleshipsSettings, Question};
use quiz_arcade::battleships::{
    BattleshipsGame, FireResponse, GateOutcome, HuntTargetAi, Phase, Side, Weapon,
};
use quiz_arcade::core::config::{config, set_config, EngineConfig};
use quiz_arcade::core::types::{Coord, InstanceId};
use quiz_arcade::engine::{MiniGame, NoopSink};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;

/// Headless Autoplay - simulated students against the opponent AI
#[derive(Parser, Debug)]
#[command(name = "autoplay")]
#[command(about = "Play Battleships headlessly and output per-game JSON summaries")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Probability the student answers a question correctly
    #[arg(long, default_value_t = 0.7)]
    accuracy: f64,

    /// Aim a barrage every n-th turn (0 = never)
    #[arg(long, default_value_t = 4)]
    barrage_every: u32,

    /// Grid size
    #[arg(long, default_value_t = 8)]
    grid_size: usize,

    /// Engine tuning file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct GameSummary {
    game: u32,
    seed: u64,
    outcome: String,
    turns: u32,
    shots_fired: u32,
    hits: u32,
    area_uses: u32,
    quiz_accuracy_percent: u32,
    opponent_shots: u32,
    stars: u8,
    rating: String,
    completion_signaled: bool,
}

/// Upper bound on player actions per game; a full grid can never need more
const MAX_ACTIONS: usize = 15 * 15 * 2;
/// Player actions plus the waits between them
const MAX_STEPS: usize = MAX_ACTIONS * 4;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_arcade=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        match EngineConfig::load(path) {
            Ok(loaded) => {
                if set_config(loaded).is_err() {
                    eprintln!("Warning: engine config already installed");
                }
            }
            Err(e) => {
                eprintln!("Warning: Failed to load config '{}': {}", path.display(), e);
                eprintln!("Using default tuning");
            }
        }
    }
    let engine = config().clone();

    let base_seed = args.seed.unwrap_or_else(rand::random);
    let settings = BattleshipsSettings {
        grid_size: args.grid_size.clamp(6, 15),
        ..BattleshipsSettings::default()
    };
    let questions = vec![Question::new(
        "sim",
        "Which answer is correct?",
        &["This one", "Not this one", "Nor this one"],
        0,
    )];

    let summaries: Vec<GameSummary> = (0..args.games)
        .map(|game| {
            let seed = base_seed.wrapping_add(game as u64);
            play_one(game, seed, &args, &settings, &questions, &engine)
        })
        .collect();

    if args.format == "json" {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize results: {e}"),
        }
    } else {
        for s in &summaries {
            println!(
                "game {:>3}  {:<4}  turns {:>3}  hits {:>3}/{:<3}  barrages {:>2}  quiz {:>3}%  {} ({}*)",
                s.game,
                s.outcome,
                s.turns,
                s.hits,
                s.shots_fired,
                s.area_uses,
                s.quiz_accuracy_percent,
                s.rating,
                s.stars
            );
        }
        let wins = summaries.iter().filter(|s| s.outcome == "win").count();
        println!("{wins}/{} games won", summaries.len());
    }
}

fn play_one(
    game_no: u32,
    seed: u64,
    args: &Args,
    settings: &BattleshipsSettings,
    questions: &[Question],
    engine: &EngineConfig,
) -> GameSummary {
    let id = InstanceId::sanitize(&format!("autoplay-{game_no}"))
        .unwrap_or_else(InstanceId::generate);
    let mut game = BattleshipsGame::new(
        id,
        settings.clone(),
        questions.to_vec(),
        engine.clone(),
        Some(seed),
        Box::new(NoopSink),
    );
    let mut student_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let mut aim = HuntTargetAi::new();
    let round_trip = engine.player_settle_ms + engine.opponent_think_ms;

    game.begin_battle();
    let mut actions = 0usize;
    for _ in 0..MAX_STEPS {
        if game.is_over() || actions >= MAX_ACTIONS {
            break;
        }
        if game.phase() != Phase::PlayerTurn || game.is_locked() {
            game.advance(game.next_transition_in().unwrap_or(round_trip));
            continue;
        }
        actions += 1;

        let choice = aim.choose_target(
            game.session().opponent.grid(),
            &mut student_rng,
            engine.hunt_attempts,
        );
        let Some((target, _)) = choice else {
            break;
        };

        let barrage = args.barrage_every > 0 && actions as u32 % args.barrage_every == 0;
        game.select_weapon(if barrage { Weapon::Barrage } else { Weapon::Torpedo });

        let mut response = game.fire(target);
        if barrage && response == FireResponse::Ignored {
            game.select_weapon(Weapon::Torpedo);
            response = game.fire(target);
        }

        match response {
            FireResponse::Shot(outcome) => {
                aim.observe(game.session().opponent.grid(), target, outcome);
            }
            FireResponse::AwaitingAnswer(question) => {
                let area = game.session().opponent.area(target, engine.area_radius);
                let fresh: Vec<Coord> = {
                    let grid = game.session().opponent.grid();
                    area.into_iter().filter(|&c| !grid.is_hit(c)).collect()
                };
                let pick = simulated_answer(&question, args.accuracy, &mut student_rng);
                game.answer(pick);
                if let Some(GateOutcome::Barrage { .. }) = game.confirm() {
                    aim.observe_area(&game.session().opponent, &fresh);
                }
            }
            FireResponse::Ignored => {
                game.select_weapon(Weapon::Torpedo);
            }
        }
    }

    let session = game.session();
    let stats = session.player_stats;
    let rating = session.rating.clone();
    GameSummary {
        game: game_no,
        seed,
        outcome: match session.winner {
            Some(Side::Player) => "win",
            Some(Side::Opponent) => "loss",
            None => "draw",
        }
        .to_string(),
        turns: stats.turns,
        shots_fired: stats.shots_fired,
        hits: stats.hits,
        area_uses: stats.area_uses,
        quiz_accuracy_percent: game.accuracy().percent(),
        opponent_shots: session.opponent_stats.shots_fired,
        stars: rating.as_ref().map_or(0, |r| r.stars),
        rating: rating.map_or_else(|| "-".to_string(), |r| r.label),
        completion_signaled: game.completion_signaled(),
    }
}

fn simulated_answer<R: Rng>(question: &Question, accuracy: f64, rng: &mut R) -> usize {
    let n = question.answers.len().max(1);
    if rng.gen_bool(accuracy.clamp(0.0, 1.0)) || n == 1 {
        question.correct_index
    } else {
        (question.correct_index + rng.gen_range(1..n)) % n
    }
}
