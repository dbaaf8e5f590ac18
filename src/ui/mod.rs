//! Terminal UI rendering using ratatui.
//!
//! Each pane is implemented in its own submodule with a `render` function;
//! [`draw`] lays them out into the dashboard.
//!
//! ## Submodules
//!
//! - [`chart`]: Line chart of the most recent readings with the threshold line
//! - [`map`]: Basemap and marker at the resolved location
//! - [`stats`]: Current, maximum, minimum and average heart rate
//! - [`common`]: Shared components (header, alert banner, threshold input,
//!   status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! │ Alert banner (when exceeded)         │
//! ├──────────────────────────────────────┤
//! │ Threshold input                      │
//! ├──────────────────────────────────────┤
//! │ Chart (chart::render)                │
//! ├────────────────────────┬─────────────┤
//! │ Map (map::render)      │ Statistics  │
//! ├────────────────────────┴─────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod chart;
pub mod common;
pub mod map;
pub mod stats;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal width for a usable display.
pub const MIN_WIDTH: u16 = 60;
/// Minimum terminal height for a usable display.
pub const MIN_HEIGHT: u16 = 20;

/// Draw the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(
            0,
            (area.height / 2).saturating_sub(2),
            area.width,
            5u16.min(area.height),
        );
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),      // Header bar
        Constraint::Length(1),      // Alert banner
        Constraint::Length(3),      // Threshold input
        Constraint::Percentage(45), // Chart
        Constraint::Min(8),         // Map and statistics
        Constraint::Length(1),      // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_alert_banner(frame, app, chunks[1]);
    common::render_threshold_input(frame, app, chunks[2]);
    chart::render(frame, app, chunks[3]);

    let bottom = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[4]);
    map::render(frame, app, bottom[0]);
    stats::render(frame, app, bottom[1]);

    common::render_status_bar(frame, app, chunks[5]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::runtime::Handle;

    use crate::config::Settings;
    use crate::geo::{Location, LocationUpdate, Locator, StaticResolver};
    use crate::map::{MapError, MapLoader};
    use crate::source::{ChannelSource, HeartRateRecord};

    fn test_app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        let locator = Locator::new(
            Arc::new(StaticResolver::new(Location::fallback())),
            Handle::current(),
            Location::fallback(),
            Duration::from_secs(1),
        );
        App::new(Box::new(source), &Settings::default(), locator).unwrap()
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let app = test_app();
        let screen = render(&app, 100, 40);

        assert!(screen.contains("No data available"));
        assert!(screen.contains("Location not available..."));
        assert!(screen.contains("N/A"));
        assert!(screen.contains("Waiting for data"));
        assert!(!screen.contains("High Heart Rate Detected"));
    }

    #[tokio::test]
    async fn test_alert_banner_and_stats() {
        let mut app = test_app();
        for (i, bpm) in [60.0, 180.0, 90.0, 160.0].into_iter().enumerate() {
            app.handle_record(HeartRateRecord::new(bpm, 1_700_000_000_000 + i as i64 * 1000));
        }

        let screen = render(&app, 100, 40);
        assert!(screen.contains("High Heart Rate Detected: 160 bpm exceeds 150 bpm!"));
        assert!(screen.contains("122.5 bpm"));
        assert!(!screen.contains("No data available"));
    }

    #[tokio::test]
    async fn test_map_pane_states() {
        let mut app = test_app();

        app.location.begin();
        assert!(render(&app, 100, 40).contains("Loading location..."));

        app.location.apply(LocationUpdate {
            seq: 1,
            location: Location::fallback(),
            fallback: true,
        });
        let screen = render(&app, 100, 40);
        assert!(screen.contains("43.6426, -79.3871"));
        assert!(screen.contains("zoom 14"));
    }

    #[tokio::test]
    async fn test_map_load_failure_renders_empty_pane() {
        let mut app = test_app().with_map_loader(MapLoader::new(|| Err(MapError::Empty)));
        app.location.apply(LocationUpdate {
            seq: 1,
            location: Location::fallback(),
            fallback: true,
        });

        let screen = render(&app, 100, 40);
        assert!(screen.contains("zoom 14"));
        assert!(!screen.contains("43.6426"));
    }

    #[tokio::test]
    async fn test_small_terminal() {
        let app = test_app();
        assert!(render(&app, 40, 10).contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_help_overlay() {
        let mut app = test_app();
        app.toggle_help();
        assert!(render(&app, 100, 40).contains("Keyboard Shortcuts"));
    }
}
