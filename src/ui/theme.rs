//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color of the heart-rate line.
    pub series: Color,
    /// Color of the threshold reference line.
    pub threshold: Color,
    /// Color for readings above the threshold.
    pub alert: Color,
    /// Color for readings at or below the threshold.
    pub ok: Color,
    /// Color of the basemap outline.
    pub coastline: Color,
    /// Color of the location marker.
    pub marker: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for pane titles and labels.
    pub header: Style,
    /// Style for the alert banner.
    pub banner: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            series: Color::LightRed,
            threshold: Color::Yellow,
            alert: Color::Red,
            ok: Color::Green,
            coastline: Color::Gray,
            marker: Color::LightMagenta,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            banner: Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            series: Color::Red,
            threshold: Color::Magenta,
            alert: Color::Red,
            ok: Color::Green,
            coastline: Color::DarkGray,
            marker: Color::Magenta,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            banner: Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a heart-rate value given whether it exceeded the threshold.
    pub fn alert_style(&self, exceeded: bool) -> Style {
        if exceeded {
            Style::default().fg(self.alert).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.ok)
        }
    }
}
