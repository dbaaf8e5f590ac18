//! Common UI components shared across panes.
//!
//! This module contains the header bar, alert banner, threshold input,
//! status bar, and help overlay.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;

/// Render the header bar.
///
/// Displays: alert indicator, source description, reading count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon, status) = match app.alert {
        Some(alert) if alert.exceeded => ("♥", "ALERT"),
        Some(_) => ("♥", "OK"),
        None => ("○", "WAITING"),
    };
    let status_style = match app.alert {
        Some(alert) => app.theme.alert_style(alert.exceeded),
        None => Style::default().add_modifier(Modifier::DIM),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", icon), status_style),
        Span::styled("PULSEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status, status_style),
        Span::raw(" │ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", app.buffer.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" readings"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the alert banner when the latest reading exceeded the threshold.
///
/// The threshold shown is the one in effect when the reading arrived.
pub fn render_alert_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(alert) = app.alert.filter(|alert| alert.exceeded) else {
        return;
    };

    let message = format!(
        "High Heart Rate Detected: {} bpm exceeds {} bpm!",
        alert.value, alert.threshold
    );
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(app.theme.banner);
    frame.render_widget(paragraph, area);
}

/// Render the threshold input field.
pub fn render_threshold_input(frame: &mut Frame, app: &App, area: Rect) {
    let input = &app.threshold_input;

    let border_color = if input.editing {
        app.theme.highlight
    } else {
        app.theme.border
    };
    let block = Block::default()
        .title(" Alert Threshold (bpm) ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(border_color));

    let line = if input.editing {
        let mut spans = vec![
            Span::styled(" > ", Style::default().fg(app.theme.highlight)),
            Span::raw(input.text.clone()),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ];
        match input.error {
            Some(ref err) => spans.push(Span::styled(
                format!("  {} (keeping {} bpm)", err, app.threshold),
                Style::default().fg(app.theme.alert),
            )),
            None => spans.push(Span::styled(
                "  Enter:apply Esc:cancel",
                Style::default().add_modifier(Modifier::DIM),
            )),
        }
        Line::from(spans)
    } else {
        Line::from(vec![
            Span::styled(
                format!(" {} bpm", app.threshold),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("  t:edit", Style::default().add_modifier(Modifier::DIM)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the status bar at the bottom.
///
/// Shows time since the last reading and available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.threshold_input.editing {
        "Type a value | Enter:apply Esc:cancel"
    } else {
        "t:threshold +/-:zoom e:export ?:help q:quit"
    };

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | {}", err, controls)
    } else if let Some(last) = app.last_update {
        format!(
            " Updated {} ago | {}",
            format_duration(last.elapsed()),
            controls
        )
    } else {
        format!(" Waiting for data... | {}", controls)
    };

    let style = if app.load_error.is_some() {
        Style::default().fg(app.theme.alert)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Threshold",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  t / Enter   Edit threshold"),
        Line::from("  0-9 .       Type value"),
        Line::from("  Enter       Apply"),
        Line::from("  Esc         Cancel"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Map",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  + / -       Zoom in/out"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r           Poll source now"),
        Line::from("  e           Export session to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
