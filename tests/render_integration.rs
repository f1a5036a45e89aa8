//! Renderer integration tests: fragments, namespacing, payload escaping

use quiz_arcade::activity::{ActivityRecord, Question};
use quiz_arcade::core::config::EngineConfig;
use quiz_arcade::core::error::ArcadeError;
use quiz_arcade::render::{render_activity, Renderer, Theme};
use serde_json::{json, Value};

fn battleships(id: &str) -> ActivityRecord {
    ActivityRecord::from_value(&json!({
        "id": id,
        "gameType": "battleships",
        "config": {
            "required": true,
            "gridSize": 6,
            "questions": [
                { "prompt": "Is 1 < 2 && 3 > 2?", "answers": ["yes", "no"], "correctIndex": 0 },
                { "prompt": "Close the tag: </script><script>alert(1)</script>", "answers": ["ok"], "correctIndex": 0 }
            ]
        }
    }))
}

/// Contents of the `<script>` element with the given id
fn script_body<'a>(html: &'a str, id: &str) -> &'a str {
    let open = format!(r#"id="{id}""#);
    let start = html.find(&open).unwrap();
    let body_start = start + html[start..].find('>').unwrap() + 1;
    let body_len = html[body_start..].find("</script>").unwrap();
    &html[body_start..body_start + body_len]
}

#[test]
fn test_fragment_payload_survives_hostile_questions() {
    let html = render_activity(&battleships("lesson-2"), None).unwrap();

    // exactly our two script elements, nothing injected by question text
    assert_eq!(html.matches("<script").count(), 2);
    assert_eq!(html.matches("</script>").count(), 2);

    let payload = script_body(&html, "bs_lesson_2-questions");
    let questions: Vec<Question> = serde_json::from_str(payload).unwrap();
    assert_eq!(questions.len(), 2);
    assert!(questions[1].prompt.contains("</script>"));
}

#[test]
fn test_mount_descriptor_is_scoped() {
    let html = render_activity(&battleships("lesson-2"), None).unwrap();
    let mount: Value = serde_json::from_str(script_body(&html, "bs_lesson_2-mount")).unwrap();

    assert_eq!(mount["rootId"], "bs_lesson_2");
    assert_eq!(mount["instanceId"], "lesson_2");
    assert_eq!(mount["required"], true);
    assert_eq!(mount["settings"]["Battleships"]["grid_size"], 6);
    assert!(html.contains(r#"data-required="true""#));
}

#[test]
fn test_two_instances_do_not_share_ids() {
    let renderer = Renderer::new(EngineConfig::default());
    let a = renderer.render(&battleships("unit-a")).unwrap().html;
    let b = renderer.render(&battleships("unit-b")).unwrap().html;
    let page = format!("{a}{b}");

    let ids: Vec<&str> = page
        .split(r#" id=""#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(ids.len(), unique.len(), "duplicate ids on one page");
}

#[test]
fn test_anonymous_activities_get_distinct_roots() {
    let record = ActivityRecord::from_value(&json!({ "gameType": "memory-match" }));
    let renderer = Renderer::new(EngineConfig::default());
    let a = renderer.render(&record).unwrap();
    let b = renderer.render(&record).unwrap();
    assert_ne!(a.root_id, b.root_id);
    assert!(a.root_id.starts_with("mm_g_"));
}

#[test]
fn test_theme_swap_changes_only_classes() {
    let record = battleships("swap");
    let harbor = Renderer::new(EngineConfig::default())
        .with_theme(Theme::harbor())
        .render(&record)
        .unwrap()
        .html;
    let midnight = Renderer::new(EngineConfig::default())
        .with_theme(Theme::midnight())
        .render(&record)
        .unwrap()
        .html;

    assert!(!midnight.contains("qa-harbor"));
    let strip = |html: &str, prefix: &str| -> String {
        let markup_start = html.find("</style>").unwrap();
        html[markup_start..]
            .replace(prefix, "THEME")
            .replace(r#""theme":"harbor""#, r#""theme":"x""#)
            .replace(r#""theme":"midnight""#, r#""theme":"x""#)
    };
    assert_eq!(strip(&harbor, "qa-harbor"), strip(&midnight, "qa-midnight"));
}

#[test]
fn test_unsupported_type_reports_its_name() {
    let record = ActivityRecord::from_value(&json!({ "id": "w", "gameType": "word-search" }));
    match render_activity(&record, None) {
        Err(ArcadeError::UnsupportedGame(name)) => assert_eq!(name, "word-search"),
        other => panic!("expected UnsupportedGame, got {other:?}"),
    }
}

#[test]
fn test_required_flag_agrees_between_markup_and_mount() {
    let record = ActivityRecord::from_value(&json!({
        "id": "tracked",
        "gameType": "memory-match",
        "config": { "isRequired": "yes" }
    }));
    let html = render_activity(&record, None).unwrap();
    let mount: Value = serde_json::from_str(script_body(&html, "mm_tracked-mount")).unwrap();

    assert_eq!(mount["required"], true);
    assert!(html.contains(r#"data-required="true""#));
}
