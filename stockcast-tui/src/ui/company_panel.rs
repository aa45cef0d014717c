//! Panel 2 — Company: profile block and the raw price table.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let (Some(profile), Some(series)) = (&app.results.profile, &app.results.series) else {
        render_empty(f, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    // Profile block
    let summary = profile
        .summary
        .as_deref()
        .unwrap_or("No business summary available.");
    let header = vec![
        Line::from(Span::styled(
            profile.name_display().to_string(),
            theme::accent(),
        )),
        Line::from(vec![
            Span::styled("Current price: ", theme::muted()),
            Span::styled(profile.price_display(), theme::positive()),
            Span::styled("   Sector: ", theme::muted()),
            Span::styled(profile.sector_display().to_string(), theme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(summary.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), chunks[0]);

    // Price table, scrolled to app.results.table_scroll.
    let visible_rows = chunks[1].height.saturating_sub(2) as usize;
    let start = app
        .results
        .table_scroll
        .min(series.len().saturating_sub(1));
    let rows: Vec<Row> = series
        .bars()
        .iter()
        .skip(start)
        .take(visible_rows.max(1))
        .map(|bar| {
            let change = bar.close - bar.open;
            Row::new(vec![
                Cell::from(bar.date.to_string()),
                Cell::from(format!("{:>10.2}", bar.open)),
                Cell::from(format!("{:>10.2}", bar.high)),
                Cell::from(format!("{:>10.2}", bar.low)),
                Cell::from(format!("{:>10.2}", bar.close))
                    .style(ratatui::style::Style::default().fg(theme::change_color(change))),
                Cell::from(format!("{:>12}", bar.volume)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(13),
        ],
    )
    .header(
        Row::new(vec!["Date", "Open", "High", "Low", "Close", "Volume"])
            .style(theme::accent()),
    );

    f.render_widget(table, chunks[1]);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No data yet. Set up a query in Panel 1 and press Enter to run.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
