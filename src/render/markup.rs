//! Static structural skeleton for each game
//!
//! Every id is derived from the instance's `RenderContext` and every class
//! comes from the theme, so two fragments on one page never collide.

use crate::activity::context::RenderContext;
use crate::activity::extract::{BattleshipsSettings, MemorySettings};
use crate::render::theme::Theme;
use std::fmt::Write;

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Skeleton<'a> {
    ctx: &'a RenderContext,
    theme: &'a Theme,
    out: String,
}

impl<'a> Skeleton<'a> {
    fn new(ctx: &'a RenderContext, theme: &'a Theme) -> Self {
        Self {
            ctx,
            theme,
            out: String::new(),
        }
    }

    /// `<tag id="root-part" class="prefix-class">`
    fn open(&mut self, tag: &str, part: &str, class: &str, extra: &str) {
        let _ = write!(
            self.out,
            r#"<{tag} id="{}" class="{}"{}>"#,
            self.ctx.part_id(part),
            self.theme.class(class),
            extra
        );
    }

    fn close(&mut self, tag: &str) {
        let _ = write!(self.out, "</{tag}>");
    }

    fn button(&mut self, part: &str, label: &str) {
        let _ = write!(
            self.out,
            r#"<button type="button" id="{}" class="{}">{}</button>"#,
            self.ctx.part_id(part),
            self.theme.class("button"),
            escape_html(label)
        );
    }

    fn text(&mut self, tag: &str, part: &str, class: &str, content: &str) {
        self.open(tag, part, class, "");
        self.out.push_str(&escape_html(content));
        self.close(tag);
    }

    fn root_open(&mut self) {
        let _ = write!(
            self.out,
            r#"<div id="{}" class="{}" data-game="{}" data-required="{}">"#,
            self.ctx.root_id(),
            self.theme.class("root"),
            escape_html(self.ctx.game_type.name()),
            self.ctx.required
        );
    }

    fn start_screen(&mut self, title: &str, blurb: &str) {
        self.open("section", "start", "panel", "");
        self.text("h2", "title", "title", title);
        self.text("p", "intro", "intro", blurb);
        self.button("start-button", "Start");
        self.close("section");
    }

    fn question_dialog(&mut self) {
        self.open(
            "div",
            "dialog",
            "dialog",
            r#" role="dialog" aria-modal="true" hidden"#,
        );
        self.text("p", "prompt", "prompt", "");
        self.open("ul", "answers", "answers", "");
        self.close("ul");
        self.text("p", "feedback", "feedback", "");
        self.button("confirm", "Continue");
        self.close("div");
    }

    fn end_screen(&mut self) {
        self.open("section", "end", "panel", " hidden");
        self.text("h2", "result", "result", "");
        self.text("p", "rating", "rating", "");
        self.text("p", "summary", "summary", "");
        self.button("restart", "Play again");
        self.close("section");
    }

    fn status_line(&mut self) {
        self.open("p", "status", "status", r#" aria-live="polite""#);
        self.close("p");
    }

    fn stat(&mut self, part: &str, label: &str) {
        let _ = write!(
            self.out,
            r#"<span class="{}">{}: <strong id="{}">0</strong></span>"#,
            self.theme.class("stat"),
            escape_html(label),
            self.ctx.part_id(part)
        );
    }

    fn grid(&mut self, part: &str, columns: usize, cells: usize, class: &str) {
        let style = format!(r#" style="grid-template-columns: repeat({columns}, 1fr);""#);
        self.open("div", part, "grid", &style);
        for i in 0..cells {
            let _ = write!(
                self.out,
                r#"<button type="button" class="{}" data-index="{i}"></button>"#,
                self.theme.class(class)
            );
        }
        self.close("div");
    }

    fn finish(mut self) -> String {
        self.button("fullscreen", "Full screen");
        self.close("div");
        self.out
    }
}

pub fn battleships_markup(
    ctx: &RenderContext,
    theme: &Theme,
    settings: &BattleshipsSettings,
) -> String {
    let n = settings.grid_size;
    let mut s = Skeleton::new(ctx, theme);
    s.root_open();
    s.start_screen(
        "Battleships",
        "Sink the enemy fleet. Answer a question correctly to launch a barrage.",
    );

    s.open("section", "deploy", "panel", " hidden");
    s.text("p", "deploy-help", "help", "Drag your ships into position, then begin.");
    s.button("rotate", "Rotate");
    s.button("randomize", "Randomize");
    s.button("begin", "Begin battle");
    s.close("section");

    s.open("section", "battle", "battle", " hidden");
    s.open("div", "boards", "boards", "");
    s.open("div", "player", "panel", "");
    s.text("h3", "player-title", "board-title", "Your fleet");
    s.grid("player-grid", n, n * n, "cell");
    s.close("div");
    s.open("div", "opponent", "panel", "");
    s.text("h3", "opponent-title", "board-title", "Enemy waters");
    s.grid("opponent-grid", n, n * n, "cell");
    s.close("div");
    s.close("div");

    s.open("div", "stats", "panel", "");
    s.stat("turns", "Turns");
    s.stat("shots", "Shots");
    s.stat("hits", "Hits");
    s.stat("accuracy", "Quiz accuracy");
    s.stat("remaining", "Enemy ships");
    s.close("div");

    s.open("div", "weapons", "weapons", r#" role="radiogroup""#);
    s.button("weapon-torpedo", "Torpedo");
    s.button("weapon-barrage", "Barrage");
    s.close("div");
    s.status_line();
    s.close("section");

    s.question_dialog();
    s.end_screen();
    s.finish()
}

pub fn memory_markup(ctx: &RenderContext, theme: &Theme, settings: &MemorySettings) -> String {
    let mut s = Skeleton::new(ctx, theme);
    s.root_open();
    s.start_screen(
        "Memory Match",
        "Match every pair. Answer a question correctly to peek at the board.",
    );

    s.open("section", "board", "battle", " hidden");
    s.grid(
        "cards",
        settings.columns.max(1),
        settings.pairs.len() * 2,
        "card",
    );
    s.open("div", "stats", "panel", "");
    s.stat("moves", "Moves");
    s.stat("matches", "Pairs found");
    s.stat("accuracy", "Quiz accuracy");
    s.close("div");
    s.button("peek", "Peek");
    s.status_line();
    s.close("section");

    s.question_dialog();
    s.end_screen();
    s.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::extract::ActivityRecord;
    use crate::core::types::GameType;
    use serde_json::json;

    fn ctx(id: &str, game_type: GameType) -> RenderContext {
        RenderContext::from_record(&ActivityRecord::new(id, game_type, json!({})))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_battleships_skeleton_has_every_part() {
        let ctx = ctx("lesson-1", GameType::Battleships);
        let html = battleships_markup(&ctx, &Theme::harbor(), &BattleshipsSettings::default());
        let parts = [
            "start",
            "deploy",
            "player-grid",
            "opponent-grid",
            "dialog",
            "end",
            "confirm",
        ];
        for part in parts {
            assert!(html.contains(&format!(r#"id="bs_lesson_1-{part}""#)), "{part}");
        }
        assert!(html.starts_with(r#"<div id="bs_lesson_1" class="qa-harbor-root""#));
        assert_eq!(html.matches("data-index=").count(), 2 * 64);
    }

    #[test]
    fn test_memory_skeleton_has_two_cards_per_pair() {
        let ctx = ctx("vocab", GameType::MemoryMatch);
        let settings = MemorySettings {
            pairs: vec![
                crate::activity::extract::CardPair::new("a", "b"),
                crate::activity::extract::CardPair::new("c", "d"),
            ],
            columns: 2,
        };
        let html = memory_markup(&ctx, &Theme::midnight(), &settings);
        assert_eq!(html.matches("qa-midnight-card\"").count(), 4);
        assert!(html.contains(r#"id="mm_vocab-peek""#));
    }
}
