//! Panel 4 — Forecast: prediction line with uncertainty band, tail table.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table};
use ratatui::Frame;

use stockcast_core::domain::ForecastSeries;

use crate::app::AppState;
use crate::theme;
use crate::ui::chart_panel::bounds;

const TAIL_ROWS: usize = 5;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(forecast) = &app.results.forecast else {
        render_empty(f, area, app.run_in_progress);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(TAIL_ROWS as u16 + 2),
        ])
        .split(area);

    render_chart(f, chunks[0], app, forecast);
    render_tail_table(f, chunks[1], forecast);
}

fn render_chart(f: &mut Frame, area: Rect, app: &AppState, forecast: &ForecastSeries) {
    let points = forecast.points();

    let yhat: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.yhat))
        .collect();
    let upper: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.yhat_upper))
        .collect();
    let lower: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.yhat_lower))
        .collect();
    // Observed closes over the in-sample stretch.
    let observed: Vec<(f64, f64)> = app
        .results
        .series
        .as_ref()
        .map(|s| {
            s.closes()
                .iter()
                .enumerate()
                .map(|(i, &c)| (i as f64, c))
                .collect()
        })
        .unwrap_or_default();

    let (y_min, y_max) = bounds(
        upper
            .iter()
            .chain(&lower)
            .chain(&observed)
            .map(|&(_, y)| y),
    );
    let x_max = points.len().saturating_sub(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("upper")
            .marker(symbols::Marker::Braille)
            .style(theme::neutral())
            .graph_type(GraphType::Line)
            .data(&upper),
        Dataset::default()
            .name("lower")
            .marker(symbols::Marker::Braille)
            .style(theme::neutral())
            .graph_type(GraphType::Line)
            .data(&lower),
        Dataset::default()
            .name("observed")
            .marker(symbols::Marker::Dot)
            .style(theme::muted())
            .graph_type(GraphType::Scatter)
            .data(&observed),
        Dataset::default()
            .name("forecast")
            .marker(symbols::Marker::Braille)
            .style(theme::accent())
            .graph_type(GraphType::Line)
            .data(&yhat),
    ];

    let first = points.first().map(|p| p.date.to_string()).unwrap_or_default();
    let last = points.last().map(|p| p.date.to_string()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("history + horizon", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_tail_table(f: &mut Frame, area: Rect, forecast: &ForecastSeries) {
    let rows: Vec<Row> = forecast
        .tail(TAIL_ROWS)
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.date.to_string()),
                Cell::from(format!("{:>10.2}", p.yhat)),
                Cell::from(format!("{:>10.2}", p.yhat_lower)),
                Cell::from(format!("{:>10.2}", p.yhat_upper)),
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
        ],
    )
    .header(
        Row::new(vec!["Date", "Forecast", "Lower", "Upper"]).style(theme::accent()),
    );

    f.render_widget(table, area);
}

fn render_empty(f: &mut Frame, area: Rect, running: bool) {
    let msg = if running {
        "Fitting model..."
    } else {
        "No forecast yet. Run a query from Panel 1 first."
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(msg, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
