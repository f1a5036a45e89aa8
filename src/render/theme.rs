//! Visual themes: a class-name prefix plus a palette-driven style sheet
//!
//! Markup only ever asks a theme for class names, so swapping themes never
//! touches engine or markup logic.

use std::fmt::Write;

/// RGB color, written out as CSS hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Darken color by a factor (0.0 = black, 1.0 = unchanged)
    pub fn darken(&self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub water: Color,
    pub ship: Color,
    pub hit: Color,
    pub miss: Color,
    pub accent: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Prefix of every class name the markup emits
    pub prefix: &'static str,
    pub palette: Palette,
}

pub const DEFAULT_THEME: &str = "harbor";

impl Default for Theme {
    fn default() -> Self {
        Self::harbor()
    }
}

impl Theme {
    pub fn harbor() -> Self {
        Self {
            name: "harbor",
            prefix: "qa-harbor",
            palette: Palette {
                background: Color::rgb(0xf4, 0xf7, 0xfb),
                surface: Color::rgb(0xff, 0xff, 0xff),
                text: Color::rgb(0x1d, 0x2b, 0x3a),
                water: Color::rgb(0x3b, 0x82, 0xc4),
                ship: Color::rgb(0x5b, 0x63, 0x6e),
                hit: Color::rgb(0xd9, 0x48, 0x3b),
                miss: Color::rgb(0xc8, 0xd6, 0xe5),
                accent: Color::rgb(0xf2, 0xa9, 0x00),
            },
        }
    }

    pub fn midnight() -> Self {
        Self {
            name: "midnight",
            prefix: "qa-midnight",
            palette: Palette {
                background: Color::rgb(0x10, 0x14, 0x1f),
                surface: Color::rgb(0x1b, 0x22, 0x33),
                text: Color::rgb(0xe6, 0xe9, 0xf0),
                water: Color::rgb(0x1e, 0x3a, 0x5f),
                ship: Color::rgb(0x8a, 0x94, 0xa6),
                hit: Color::rgb(0xff, 0x5c, 0x5c),
                miss: Color::rgb(0x2c, 0x3e, 0x57),
                accent: Color::rgb(0x7c, 0xd9, 0xff),
            },
        }
    }

    /// Look up a built-in theme, falling back to the default
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "harbor" | "harbour" => Self::harbor(),
            "midnight" | "dark" => Self::midnight(),
            other => {
                tracing::debug!(theme = other, "Unknown theme, using {}", DEFAULT_THEME);
                Self::default()
            }
        }
    }

    pub fn builtin_names() -> [&'static str; 2] {
        ["harbor", "midnight"]
    }

    /// Prefixed class name, e.g. `qa-harbor-cell`
    pub fn class(&self, part: &str) -> String {
        format!("{}-{}", self.prefix, part)
    }

    /// Style sheet scoped under one instance root so themes never leak
    /// between fragments on the same page
    pub fn stylesheet(&self, root_id: &str) -> String {
        let p = &self.palette;
        let scope = format!("#{root_id}");
        let mut css = String::new();
        let _ = writeln!(
            css,
            "{scope}.{} {{ background: {}; color: {}; font-family: sans-serif; padding: 1rem; }}",
            self.class("root"),
            p.background.hex(),
            p.text.hex()
        );
        let mut rule = |selector: &str, body: String| {
            let _ = writeln!(css, "{scope} {selector} {{ {body} }}");
        };

        rule(
            &format!(".{}", self.class("panel")),
            format!(
                "background: {}; border-radius: 6px; padding: 0.75rem;",
                p.surface.hex()
            ),
        );
        rule(
            &format!(".{}", self.class("grid")),
            "display: grid; gap: 2px;".to_string(),
        );
        rule(
            &format!(".{}", self.class("cell")),
            format!(
                "background: {}; aspect-ratio: 1; border: 1px solid {};",
                p.water.hex(),
                p.water.darken(0.7).hex()
            ),
        );
        rule(
            &format!(".{}", self.class("cell-ship")),
            format!("background: {};", p.ship.hex()),
        );
        rule(
            &format!(".{}", self.class("cell-hit")),
            format!("background: {};", p.hit.hex()),
        );
        rule(
            &format!(".{}", self.class("cell-sunk")),
            format!("background: {};", p.hit.darken(0.6).hex()),
        );
        rule(
            &format!(".{}", self.class("cell-miss")),
            format!("background: {};", p.miss.hex()),
        );
        rule(
            &format!(".{}", self.class("cell-revealed")),
            format!("outline: 3px solid {};", p.accent.hex()),
        );
        rule(
            &format!(".{}", self.class("card")),
            format!(
                "background: {}; min-height: 4rem; border-radius: 4px;",
                p.ship.hex()
            ),
        );
        rule(
            &format!(".{}", self.class("card-up")),
            format!("background: {};", p.surface.hex()),
        );
        rule(
            &format!(".{}", self.class("card-matched")),
            format!("background: {}; opacity: 0.6;", p.miss.hex()),
        );
        rule(
            &format!(".{}", self.class("card-hinted")),
            format!("outline: 3px solid {};", p.accent.hex()),
        );
        rule(
            &format!(".{}", self.class("button")),
            format!(
                "background: {}; color: {}; border: none; padding: 0.4rem 0.9rem;",
                p.accent.hex(),
                p.background.hex()
            ),
        );
        rule(
            &format!(".{}", self.class("dialog")),
            format!(
                "background: {}; border: 2px solid {};",
                p.surface.hex(),
                p.accent.hex()
            ),
        );
        rule("[hidden]", "display: none !important;".to_string());
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::by_name("neon").name, DEFAULT_THEME);
        assert_eq!(Theme::by_name(" Midnight ").name, "midnight");
    }

    #[test]
    fn test_stylesheet_is_scoped_and_prefixed() {
        let theme = Theme::midnight();
        let css = theme.stylesheet("bs_lesson1");
        for line in css.lines() {
            assert!(line.starts_with("#bs_lesson1"), "unscoped rule: {line}");
        }
        assert!(css.starts_with("#bs_lesson1.qa-midnight-root {"));
        assert!(css.contains("#bs_lesson1 .qa-midnight-cell-hit"));
        assert!(!css.contains("qa-harbor"));
    }

    #[test]
    fn test_color_hex_and_darken() {
        let c = Color::rgb(200, 100, 0);
        assert_eq!(c.hex(), "#c86400");
        assert_eq!(c.darken(0.5), Color::rgb(100, 50, 0));
    }
}
