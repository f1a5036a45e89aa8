//! Composes one embeddable fragment per game instance:
//! scoped style sheet, structural markup, question payload, mount descriptor.

use crate::activity::context::RenderContext;
use crate::activity::extract::{extract_config, ActivityRecord, GameConfig, GameSettings};
use crate::activity::question::Question;
use crate::core::config::{config, EngineConfig};
use crate::core::error::{ArcadeError, Result};
use crate::render::markup::{battleships_markup, memory_markup};
use crate::render::theme::Theme;
use serde::Serialize;

/// Make serialized JSON safe to embed inside a `<script>` element.
///
/// `</script>`, `<!--` and the JS line terminators U+2028/U+2029 can no
/// longer appear literally; the JSON value is unchanged.
pub fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Everything the client engine needs to attach to its markup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountDescriptor<'a> {
    pub instance_id: &'a str,
    pub root_id: String,
    pub game_type: &'a str,
    pub required: bool,
    pub theme: &'static str,
    pub seed: Option<u64>,
    pub settings: &'a GameSettings,
    pub engine: &'a EngineConfig,
}

/// Output of one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub root_id: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    /// Overrides the theme named in the activity
    theme: Option<Theme>,
    engine: EngineConfig,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(config().clone())
    }
}

impl Renderer {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            theme: None,
            engine,
        }
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    fn theme_for(&self, config: &GameConfig) -> Theme {
        match (&self.theme, &config.theme) {
            (Some(theme), _) => theme.clone(),
            (None, Some(name)) => Theme::by_name(name),
            (None, None) => Theme::default(),
        }
    }

    pub fn render(&self, record: &ActivityRecord) -> Result<Fragment> {
        let ctx = RenderContext::from_record(record);
        let config = extract_config(record);
        let theme = self.theme_for(&config);

        let markup = match &config.settings {
            GameSettings::Battleships(settings) => battleships_markup(&ctx, &theme, settings),
            GameSettings::MemoryMatch(settings) => memory_markup(&ctx, &theme, settings),
            GameSettings::Unsupported => {
                tracing::warn!(
                    game_type = ctx.game_type.name(),
                    instance = %ctx.instance_id,
                    "No engine for activity type"
                );
                return Err(ArcadeError::UnsupportedGame(
                    ctx.game_type.name().to_string(),
                ));
            }
        };

        let root_id = ctx.root_id();
        let questions = self.question_payload(&config.questions)?;
        let mount = MountDescriptor {
            instance_id: ctx.instance_id.as_str(),
            root_id: root_id.clone(),
            game_type: ctx.game_type.name(),
            required: config.required,
            theme: theme.name,
            seed: config.seed,
            settings: &config.settings,
            engine: &self.engine,
        };
        let mount = escape_script_json(&serde_json::to_string(&mount)?);

        let mut html = String::new();
        html.push_str(&format!(
            "<style data-for=\"{root_id}\">\n{}</style>\n",
            theme.stylesheet(&root_id)
        ));
        html.push_str(&markup);
        html.push('\n');
        html.push_str(&format!(
            "<script type=\"application/json\" id=\"{}\">{questions}</script>\n",
            ctx.part_id("questions")
        ));
        html.push_str(&format!(
            "<script type=\"application/json\" id=\"{}\" data-mount=\"{root_id}\">{mount}</script>\n",
            ctx.part_id("mount")
        ));

        tracing::debug!(
            root = %root_id,
            theme = theme.name,
            questions = config.questions.len(),
            "Rendered activity"
        );
        Ok(Fragment { root_id, html })
    }

    fn question_payload(&self, questions: &[Question]) -> Result<String> {
        if questions.is_empty() {
            tracing::debug!("Empty question pool, engine will use the fallback question");
        }
        Ok(escape_script_json(&serde_json::to_string(questions)?))
    }
}

/// Render one activity with the engine defaults and an optional theme name
pub fn render_activity(record: &ActivityRecord, theme: Option<&str>) -> Result<String> {
    let mut renderer = Renderer::default();
    if let Some(name) = theme {
        renderer = renderer.with_theme(Theme::by_name(name));
    }
    renderer.render(record).map(|f| f.html)
}
