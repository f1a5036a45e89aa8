//! Process-wide engine config reaches every default construction path.
//!
//! Kept in its own test binary: the global can only be installed once.

use quiz_arcade::activity::ActivityRecord;
use quiz_arcade::core::config::{config, set_config, EngineConfig};
use quiz_arcade::core::types::Coord;
use quiz_arcade::engine::{MiniGame, NoopSink};
use quiz_arcade::host::InstanceRegistry;
use quiz_arcade::render::{render_activity, Renderer};
use serde_json::json;

#[test]
fn test_installed_config_drives_defaults() {
    let tuned = EngineConfig {
        player_settle_ms: 10,
        ..EngineConfig::default()
    };
    assert!(set_config(tuned).is_ok());
    assert_eq!(config().player_settle_ms, 10);

    let mut registry = InstanceRegistry::default();
    assert_eq!(registry.engine().player_settle_ms, 10);
    assert_eq!(Renderer::default().engine().player_settle_ms, 10);

    let record = ActivityRecord::from_value(&json!({
        "id": "tuned",
        "gameType": "battleships",
        "config": { "seed": 4 }
    }));
    let html = render_activity(&record, None).unwrap();
    assert!(html.contains(r#""player_settle_ms":10"#));

    // the spawned game hands the turn over after the tuned settle delay
    let id = registry.spawn(&record, NoopSink).unwrap();
    let game = registry.get_mut(&id).unwrap().game.battleships_mut().unwrap();
    game.begin_battle();
    game.fire(Coord::new(0, 0));
    game.advance(10);
    assert_eq!(game.session().opponent_stats.shots_fired, 1);
    assert!(game.is_locked());

    // a second install is refused
    assert!(set_config(EngineConfig::default()).is_err());
}
