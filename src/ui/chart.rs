//! Heart-rate line chart.
//!
//! Plots the most recent readings against their local time, with the
//! current threshold drawn as a reference line.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::ChartPoint;

/// Render the chart pane.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Heart Rate (bpm) ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let points = app.chart_points();
    if points.is_empty() {
        let paragraph = Paragraph::new("No data available")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let threshold = app.threshold.bpm();
    let series: Vec<(f64, f64)> =
        points.iter().enumerate().map(|(i, p)| (i as f64, p.value)).collect();
    let x_max = points.len().saturating_sub(1).max(1) as f64;
    let threshold_line = [(0.0, threshold), (x_max, threshold)];
    let [y_min, y_max] = y_bounds(&points, threshold);

    let datasets = vec![
        Dataset::default()
            .name("heart rate")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.series))
            .data(&series),
        Dataset::default()
            .name(format!("threshold {}", app.threshold))
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.threshold))
            .data(&threshold_line),
    ];

    let mut x_axis = Axis::default()
        .style(Style::default().fg(app.theme.border))
        .bounds([0.0, x_max]);
    // The widget needs at least two labels to lay them out
    if points.len() >= 2 {
        let labels: Vec<Span> = points.iter().map(|p| Span::raw(p.label.clone())).collect();
        x_axis = x_axis.labels(labels);
    }

    let y_axis = Axis::default()
        .style(Style::default().fg(app.theme.border))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.0}", y_min)),
            Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.0}", y_max)),
        ]);

    let chart = Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis);
    frame.render_widget(chart, area);
}

/// Y-axis bounds covering every point and the threshold, padded and
/// rounded out to multiples of ten.
pub fn y_bounds(points: &[ChartPoint], threshold: f64) -> [f64; 2] {
    let (lo, hi) = points
        .iter()
        .fold((threshold, threshold), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));

    let lower = (((lo - 10.0) / 10.0).floor() * 10.0).max(0.0);
    let upper = ((hi + 10.0) / 10.0).ceil() * 10.0;
    [lower, upper]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64) -> ChartPoint {
        ChartPoint {
            label: "12:00:00".to_string(),
            value,
        }
    }

    #[test]
    fn test_y_bounds_include_threshold() {
        assert_eq!(y_bounds(&[point(60.0), point(180.0)], 150.0), [50.0, 190.0]);
        assert_eq!(y_bounds(&[point(70.0), point(75.0)], 150.0), [60.0, 160.0]);
    }

    #[test]
    fn test_y_bounds_floor_at_zero() {
        assert_eq!(y_bounds(&[point(3.0)], 5.0), [0.0, 20.0]);
    }
}
