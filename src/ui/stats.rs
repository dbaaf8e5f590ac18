//! Session statistics pane.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render current, maximum, minimum and average heart rate.
///
/// Every value reads `N/A` until the first reading arrives.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Statistics ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let label = Style::default().add_modifier(Modifier::BOLD);

    let lines = if app.buffer.is_empty() {
        ["Current", "Maximum", "Minimum", "Average"]
            .into_iter()
            .map(|name| {
                Line::from(vec![
                    Span::styled(format!(" {:<9}", name), label),
                    Span::styled("N/A", Style::default().add_modifier(Modifier::DIM)),
                ])
            })
            .collect()
    } else {
        let stats = app.statistics();
        vec![
            Line::from(vec![
                Span::styled(format!(" {:<9}", "Current"), label),
                Span::styled(
                    format!("{} bpm", stats.current),
                    app.theme.alert_style(app.is_alerting()),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!(" {:<9}", "Maximum"), label),
                Span::raw(format!("{} bpm", stats.max)),
            ]),
            Line::from(vec![
                Span::styled(format!(" {:<9}", "Minimum"), label),
                Span::raw(format!("{} bpm", stats.min)),
            ]),
            Line::from(vec![
                Span::styled(format!(" {:<9}", "Average"), label),
                Span::raw(format!("{} bpm", stats.avg_label())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!(" {} readings", app.buffer.len()),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ]
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
