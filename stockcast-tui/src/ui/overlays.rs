//! Overlays — welcome screen, symbol picker, error history.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

pub fn render_welcome(f: &mut Frame, area: Rect) {
    let rect = centered_rect(70, 60, area);
    f.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Stockcast ");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Stock price exploration & forecasting",
            theme::accent(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Pick a company, choose a date range, and set the",
            theme::text(),
        )),
        Line::from(Span::styled(
            "  prediction horizon. The dashboard fetches the price",
            theme::text(),
        )),
        Line::from(Span::styled(
            "  history, overlays volatility bands, and fits an",
            theme::text(),
        )),
        Line::from(Span::styled(
            "  additive trend + seasonality forecast.",
            theme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  This is an educational tool, not investment advice.",
            theme::warning(),
        )),
        Line::from(""),
        Line::from(Span::styled("  Press any key to begin.", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_symbol_picker(f: &mut Frame, area: Rect, app: &AppState) {
    let rect = centered_rect(40, 60, area);
    f.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Symbol search ");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(app.query.picker_input.clone(), theme::text()),
            Span::styled("_", theme::accent()),
        ]),
        Line::from(""),
    ];

    let matches = app.query.catalog.filter(&app.query.picker_input);
    let visible = inner.height.saturating_sub(3) as usize;
    // Keep the cursor in view.
    let offset = app
        .query
        .picker_cursor
        .saturating_sub(visible.saturating_sub(1));
    for (i, symbol) in matches.iter().enumerate().skip(offset).take(visible) {
        let style = if i == app.query.picker_cursor {
            theme::selected_row()
        } else {
            theme::text()
        };
        lines.push(Line::from(Span::styled(format!("  {symbol}"), style)));
    }
    if matches.is_empty() && !app.query.picker_input.is_empty() {
        lines.push(Line::from(Span::styled(
            "  no catalog match — Enter uses the typed symbol",
            theme::muted(),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let rect = centered_rect(80, 70, area);
    f.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" Errors ({}) — Esc closes ", app.error_history.len()));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    if app.error_history.is_empty() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "  No errors recorded this session.",
                theme::muted(),
            ))),
            inner,
        );
        return;
    }

    let visible = inner.height as usize;
    let lines: Vec<Line> = app
        .error_history
        .iter()
        .skip(app.error_scroll)
        .take(visible)
        .map(|rec| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", rec.timestamp.format("%H:%M:%S")),
                    theme::muted(),
                ),
                Span::styled(format!("[{:<4}] ", rec.category.label()), theme::negative()),
                Span::styled(rec.message.clone(), theme::text()),
                Span::styled(format!("  ({})", rec.context), theme::muted()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
