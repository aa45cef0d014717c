//! Panel 3 — Chart: close price with the volatility-band overlay.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let (Some(series), Some(bands)) = (&app.results.series, &app.results.bands) else {
        render_empty(f, area);
        return;
    };

    let closes = series.closes();
    let close_data: Vec<(f64, f64)> = to_points(&closes);
    let upper_data: Vec<(f64, f64)> = to_points(&bands.upper);
    let middle_data: Vec<(f64, f64)> = to_points(&bands.middle);
    let lower_data: Vec<(f64, f64)> = to_points(&bands.lower);

    let (y_min, y_max) = bounds(
        close_data
            .iter()
            .chain(&upper_data)
            .chain(&lower_data)
            .map(|&(_, y)| y),
    );
    let x_max = closes.len().saturating_sub(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name(format!(
                "upper ({}d ±{}σ)",
                bands.window, bands.multiplier
            ))
            .marker(symbols::Marker::Braille)
            .style(theme::neutral())
            .graph_type(GraphType::Line)
            .data(&upper_data),
        Dataset::default()
            .name("mean")
            .marker(symbols::Marker::Braille)
            .style(theme::muted())
            .graph_type(GraphType::Line)
            .data(&middle_data),
        Dataset::default()
            .name("lower")
            .marker(symbols::Marker::Braille)
            .style(theme::neutral())
            .graph_type(GraphType::Line)
            .data(&lower_data),
        Dataset::default()
            .name("close")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::ACCENT))
            .graph_type(GraphType::Line)
            .data(&close_data),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled(series.symbol().to_string(), theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(series.first_date().to_string(), theme::muted()),
                    Span::styled(series.last_date().to_string(), theme::muted()),
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

/// Index the values as (x, y), dropping NaN warmup slots.
pub(crate) fn to_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Y-axis bounds with 5% padding.
pub(crate) fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let padding = (max - min).abs().max(1e-9) * 0.05;
    (min - padding, max + padding)
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No chart yet. Run a query from Panel 1 first.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
