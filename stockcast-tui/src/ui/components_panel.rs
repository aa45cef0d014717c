//! Panel 5 — Components: trend / weekly / yearly decomposition charts.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::chart_panel::bounds;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(forecast) = &app.results.forecast else {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No decomposition yet. Run a query from Panel 1 first.",
                theme::muted(),
            )),
        ];
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let points = forecast.points();
    let trend: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.trend))
        .collect();
    let weekly: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.weekly))
        .collect();
    let yearly: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.yearly))
        .collect();

    render_component(f, chunks[0], "trend", &trend);
    render_component(f, chunks[1], "weekly", &weekly);
    render_component(f, chunks[2], "yearly", &yearly);
}

fn render_component(f: &mut Frame, area: Rect, name: &str, data: &[(f64, f64)]) {
    let (y_min, y_max) = bounds(data.iter().map(|&(_, y)| y));
    let x_max = data.len().saturating_sub(1) as f64;

    let dataset = Dataset::default()
        .name(name.to_string())
        .marker(symbols::Marker::Braille)
        .style(theme::accent())
        .graph_type(GraphType::Line)
        .data(data);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(name.to_string(), theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}"), theme::muted()),
                    Span::styled(format!("{y_max:.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
