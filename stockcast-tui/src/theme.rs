//! Color tokens for the dashboard — neon accents on a dark terminal.

use ratatui::style::{Color, Modifier, Style};

/// Electric cyan — focus and primary lines.
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
/// Neon green — gains, success.
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
/// Hot pink — losses, failures.
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
/// Neon orange — warnings.
pub const WARNING: Color = Color::Rgb(255, 140, 0);
/// Cool purple — secondary series (forecast bounds, components).
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
/// Steel blue — muted text, axes.
pub const MUTED: Color = Color::Rgb(100, 149, 237);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(Color::White)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        muted()
    }
}

/// Highlight style for the row under the cursor.
pub fn selected_row() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Color for a daily price change.
pub fn change_color(delta: f64) -> Color {
    if delta >= 0.0 {
        POSITIVE
    } else {
        NEGATIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_color_signs() {
        assert_eq!(change_color(1.0), POSITIVE);
        assert_eq!(change_color(0.0), POSITIVE);
        assert_eq!(change_color(-0.5), NEGATIVE);
    }

    #[test]
    fn panel_border_follows_focus() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
    }
}
