//! Panel 1 — Query: the input collector.
//!
//! Symbol, date range, horizon slider, and the run action. Every run
//! re-executes the whole pipeline from scratch with these values.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, QueryField};
use crate::theme;
use crate::ui::widgets::slider;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let q = &app.query;
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Query Parameters", theme::accent())),
        Line::from(""),
    ];

    for field in QueryField::ALL {
        let selected = q.field() == field;
        let marker = if selected { "▸ " } else { "  " };
        let label_style = if selected {
            theme::selected_row()
        } else {
            theme::text()
        };

        let line = match field {
            QueryField::Symbol => Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<12}", "Symbol"), label_style),
                Span::styled(q.symbol.clone(), theme::accent()),
                Span::styled(
                    "   (h/l to step, Enter or s to search)",
                    theme::muted(),
                ),
            ]),
            QueryField::StartDate => Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<12}", "Start date"), label_style),
                Span::styled(q.start_input.clone(), theme::text()),
                Span::styled("   (type YYYY-MM-DD)", theme::muted()),
            ]),
            QueryField::EndDate => Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<12}", "End date"), label_style),
                Span::styled(q.end_input.clone(), theme::text()),
                Span::styled("   (type YYYY-MM-DD)", theme::muted()),
            ]),
            QueryField::Horizon => Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<12}", "Horizon"), label_style),
                Span::styled(
                    slider_line_for(q.horizon_years),
                    theme::accent(),
                ),
                Span::styled(
                    format!("   {} year(s) of prediction", q.horizon_years),
                    theme::muted(),
                ),
            ]),
            QueryField::Run => {
                let action = if app.run_in_progress {
                    Span::styled("Running...", theme::warning())
                } else {
                    Span::styled("Run forecast (Enter)", theme::positive())
                };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<12}", ""), label_style),
                    action,
                ])
            }
        };
        lines.push(line);
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "Catalog: {} tickers ({})",
            q.catalog.len(),
            q.catalog.source().label()
        ),
        theme::muted(),
    )));
    if app.synthetic {
        lines.push(Line::from(Span::styled(
            "SYNTHETIC MODE — generated data, no market access",
            theme::warning(),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn slider_line_for(value: u32) -> String {
    slider::slider_line(
        value,
        stockcast_core::forecast::MIN_HORIZON_YEARS,
        stockcast_core::forecast::MAX_HORIZON_YEARS,
        16,
    )
}
