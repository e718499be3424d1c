use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::APP_DIR;

pub const DEFAULT_THEME: &str = "candy";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub title: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub glyph: String,
    pub glyph_done: String,
    pub symbol_typed: String,
    pub symbol_pending: String,
    pub tone: String,
    pub hint: String,
    pub correct: String,
    pub wrong: String,
    pub wrong_bg: String,
    pub celebrate: String,
    pub key_expected_bg: String,
    pub key_expected_fg: String,
    pub key_pressed_bg: String,
    pub key_initial: String,
    pub key_medial: String,
    pub key_final: String,
    pub key_tone: String,
}

impl Theme {
    fn user_theme_path(name: &str) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("themes").join(format!("{name}.toml")))
    }

    pub fn load(name: &str) -> Option<Self> {
        // User themes shadow bundled ones of the same name.
        if let Some(path) = Self::user_theme_path(name) {
            if let Ok(content) = fs::read_to_string(&path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => warn!(path = %path.display(), %err, "ignoring invalid user theme"),
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#fffbeb".to_string(),
            fg: "#334155".to_string(),
            title: "#f472b6".to_string(),
            accent: "#38bdf8".to_string(),
            accent_dim: "#bae6fd".to_string(),
            border: "#cbd5e1".to_string(),
            border_focused: "#f9a8d4".to_string(),
            header_bg: "#fce7f3".to_string(),
            header_fg: "#475569".to_string(),
            bar_filled: "#f472b6".to_string(),
            bar_empty: "#f1f5f9".to_string(),
            glyph: "#334155".to_string(),
            glyph_done: "#94a3b8".to_string(),
            symbol_typed: "#0ea5e9".to_string(),
            symbol_pending: "#cbd5e1".to_string(),
            tone: "#ec4899".to_string(),
            hint: "#64748b".to_string(),
            correct: "#22c55e".to_string(),
            wrong: "#ef4444".to_string(),
            wrong_bg: "#fee2e2".to_string(),
            celebrate: "#eab308".to_string(),
            key_expected_bg: "#fde047".to_string(),
            key_expected_fg: "#1e293b".to_string(),
            key_pressed_bg: "#7dd3fc".to_string(),
            key_initial: "#0284c7".to_string(),
            key_medial: "#16a34a".to_string(),
            key_final: "#c026d3".to_string(),
            key_tone: "#db2777".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::Reset
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn title(&self) -> Color { Self::parse_color(&self.title) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn glyph(&self) -> Color { Self::parse_color(&self.glyph) }
    pub fn glyph_done(&self) -> Color { Self::parse_color(&self.glyph_done) }
    pub fn symbol_typed(&self) -> Color { Self::parse_color(&self.symbol_typed) }
    pub fn symbol_pending(&self) -> Color { Self::parse_color(&self.symbol_pending) }
    pub fn tone(&self) -> Color { Self::parse_color(&self.tone) }
    pub fn hint(&self) -> Color { Self::parse_color(&self.hint) }
    pub fn correct(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn wrong(&self) -> Color { Self::parse_color(&self.wrong) }
    pub fn wrong_bg(&self) -> Color { Self::parse_color(&self.wrong_bg) }
    pub fn celebrate(&self) -> Color { Self::parse_color(&self.celebrate) }
    pub fn key_expected_bg(&self) -> Color { Self::parse_color(&self.key_expected_bg) }
    pub fn key_expected_fg(&self) -> Color { Self::parse_color(&self.key_expected_fg) }
    pub fn key_pressed_bg(&self) -> Color { Self::parse_color(&self.key_pressed_bg) }
    pub fn key_initial(&self) -> Color { Self::parse_color(&self.key_initial) }
    pub fn key_medial(&self) -> Color { Self::parse_color(&self.key_medial) }
    pub fn key_final(&self) -> Color { Self::parse_color(&self.key_final) }
    pub fn key_tone(&self) -> Color { Self::parse_color(&self.key_tone) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"candy".to_string()));
        assert!(names.contains(&"terminal-dark".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn unknown_theme_is_none() {
        assert!(Theme::load("no-such-theme").is_none());
    }

    #[test]
    fn parse_color_handles_bad_input() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("#zzz"), Color::Reset);
    }
}
