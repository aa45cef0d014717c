//! Panel 6 — Help: keyboard reference.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let key = |k: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), theme::accent()),
            Span::styled(desc.to_string(), theme::text()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled("Global", theme::warning())),
        key("1-6", "jump to panel"),
        key("Tab/S-Tab", "next / previous panel"),
        key("r", "re-run the pipeline with current query"),
        key("q", "quit"),
        Line::from(""),
        Line::from(Span::styled("Query panel", theme::warning())),
        key("j/k", "move between fields"),
        key("h/l", "step symbol, adjust horizon"),
        key("s / Enter", "open symbol search (on symbol row)"),
        key("0-9 -", "edit date fields in place"),
        key("Enter", "run fetch + forecast"),
        key("Esc", "cancel a run in progress"),
        Line::from(""),
        Line::from(Span::styled("Company panel", theme::warning())),
        key("j/k g/G", "scroll the price table"),
        Line::from(""),
        Line::from(Span::styled("Here", theme::warning())),
        key("e", "open error history"),
        Line::from(""),
        Line::from(Span::styled(
            "Pipeline: query -> fetch bars + profile -> volatility bands ->",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "fit trend+seasonality model -> extend 1-4 years -> render.",
            theme::muted(),
        )),
    ];

    if !app.error_history.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} error(s) recorded — press e", app.error_history.len()),
            theme::negative(),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}
