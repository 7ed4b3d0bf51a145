//! Palette - Visual Design System
//!
//! Maps the global [`ThemeValue`] to concrete ratatui colors and styles.
//! Every widget takes its colors from a `Palette`, never from literals.

use ratatui::style::{Color, Modifier, Style};

use crate::theme::ThemeValue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub theme: ThemeValue,

    // Surfaces
    pub background: Color,
    pub surface: Color,
    pub border: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,

    // Accents
    pub brand_blue: Color,
    pub chart_revenue: Color,
    pub chart_profit: Color,

    // Status colors
    pub success_green: Color,
    pub error_red: Color,
    pub error_surface: Color,
}

impl Palette {
    pub fn for_theme(theme: ThemeValue) -> Self {
        match theme {
            ThemeValue::Dark => Self::dark(),
            ThemeValue::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            theme: ThemeValue::Dark,
            background: Color::Rgb(13, 17, 23),    // #0D1117
            surface: Color::Rgb(22, 27, 34),       // #161B22
            border: Color::Rgb(48, 54, 61),        // #30363D
            text_primary: Color::Rgb(230, 237, 243), // #E6EDF3
            text_secondary: Color::Rgb(156, 163, 175), // #9CA3AF
            brand_blue: Color::Rgb(88, 166, 255),  // #58A6FF
            chart_revenue: Color::Rgb(136, 132, 216), // #8884D8
            chart_profit: Color::Rgb(130, 202, 157), // #82CA9D
            success_green: Color::Rgb(63, 185, 80), // #3FB950
            error_red: Color::Rgb(248, 81, 73),    // #F85149
            error_surface: Color::Rgb(60, 20, 20),
        }
    }

    pub fn light() -> Self {
        Self {
            theme: ThemeValue::Light,
            background: Color::Rgb(249, 250, 251), // #F9FAFB
            surface: Color::Rgb(255, 255, 255),
            border: Color::Rgb(209, 213, 219),     // #D1D5DB
            text_primary: Color::Rgb(17, 24, 39),  // #111827
            text_secondary: Color::Rgb(75, 85, 99), // #4B5563
            brand_blue: Color::Rgb(9, 105, 218),   // #0969DA
            chart_revenue: Color::Rgb(99, 91, 200),
            chart_profit: Color::Rgb(26, 127, 55),
            success_green: Color::Rgb(26, 127, 55), // #1A7F37
            error_red: Color::Rgb(207, 34, 46),    // #CF222E
            error_surface: Color::Rgb(255, 235, 233),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn base(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.brand_blue)
    }

    /// Active sidebar entry
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.brand_blue)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success_green)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error_red)
            .add_modifier(Modifier::BOLD)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons and Symbols
// ─────────────────────────────────────────────────────────────────────────────

pub mod icons {
    pub const SUN: &str = "☀";
    pub const MOON: &str = "☾";
    pub const INFO: &str = "ⓘ";
    pub const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
    pub const CHECK: &str = "✔";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_follows_theme() {
        assert_eq!(Palette::for_theme(ThemeValue::Dark).theme, ThemeValue::Dark);
        assert_eq!(Palette::for_theme(ThemeValue::Light), Palette::light());
    }

    #[test]
    fn test_light_and_dark_differ() {
        let dark = Palette::dark();
        let light = Palette::light();
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.text_primary, light.text_primary);
    }
}
