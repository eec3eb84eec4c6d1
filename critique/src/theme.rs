//! Color theme system for critique.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! critique renders. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB; requires truecolor.
//!
//! Result encodings (complexity bars, issue badges) are not themed: they come
//! from `critique_core::encode` and are converted with [`rgb`].

use critique_core::encode::Rgb;
use ratatui::style::Color;
use tracing::warn;

/// All color values used across critique's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Result panel
    /// Headings inside the result panel ("Issues", "Suggestions").
    pub heading: Color,
    /// Muted text: placeholders, line numbers, suggestion prefixes.
    pub muted: Color,
    /// Error view text.
    pub error: Color,
    /// Inline `code` spans in explanations.
    pub inline_code: Color,
    /// Unfilled part of the rating gauge.
    pub gauge_track: Color,

    // Diff view
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,
    /// Notification color for successful actions.
    pub notice_ok: Color,
    /// Notification color for failed actions.
    pub notice_err: Color,

    /// syntect theme used to highlight the code panels.
    pub syntax_theme: &'static str,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            heading: Color::White,
            muted: Color::DarkGray,
            error: Color::Red,
            inline_code: Color::Yellow,
            gauge_track: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            notice_ok: Color::Green,
            notice_err: Color::Red,

            syntax_theme: "base16-ocean.dark",
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            heading: lavender,
            muted: overlay1,
            error: red,
            inline_code: peach,
            gauge_track: surface1,

            diff_added: green,
            diff_removed: red,
            diff_context: text,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            notice_ok: green,
            notice_err: red,

            syntax_theme: "base16-mocha.dark",
        }
    }

    /// Resolves a theme name to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup. The fallback is logged.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}

/// Converts an encoder color to a truecolor ratatui color.
pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").border_active, Theme::dark().border_active);
        assert_eq!(
            Theme::from_name("catppuccin_mocha").border_active,
            Theme::catppuccin_mocha().border_active
        );
    }

    #[test]
    fn encoder_colors_convert_exactly() {
        assert_eq!(rgb(critique_core::encode::RED), Color::Rgb(0xf4, 0x43, 0x36));
    }
}
