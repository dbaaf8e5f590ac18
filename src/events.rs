use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// File written by the in-app export key.
pub const EXPORT_PATH: &str = "pulsewatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases as well as presses
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the threshold field is focused, keystrokes go to it
    if app.threshold_input.editing {
        handle_threshold_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Threshold
        KeyCode::Char('t') | KeyCode::Enter => app.start_threshold_edit(),

        // Map zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Poll now
        KeyCode::Char('r') => {
            if !app.poll_source() {
                app.set_status_message("No new readings".to_string());
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_session(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while the threshold field is focused
fn handle_threshold_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_threshold_edit(),
        KeyCode::Esc => app.cancel_threshold_edit(),
        KeyCode::Backspace => app.threshold_pop(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_threshold_edit();
            app.quit();
        }
        KeyCode::Char(c) => app.threshold_push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::runtime::Handle;

    use crate::config::Settings;
    use crate::geo::{Location, Locator, StaticResolver};
    use crate::source::ChannelSource;

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

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_threshold_typing() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('t'));
        assert!(app.threshold_input.editing);

        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        // 'q' is swallowed by the field rather than quitting
        for code in [KeyCode::Char('1'), KeyCode::Char('2'), KeyCode::Char('q'), KeyCode::Char('5')] {
            press(&mut app, code);
        }
        press(&mut app, KeyCode::Enter);

        assert!(app.running);
        assert!(!app.threshold_input.editing);
        assert_eq!(app.threshold.bpm(), 125.0);
    }

    #[tokio::test]
    async fn test_threshold_escape() {
        let mut app = test_app();

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.threshold.bpm(), 150.0);
        assert!(!app.threshold_input.editing);
    }

    #[tokio::test]
    async fn test_zoom_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.zoom, 15);
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.zoom, 13);
    }

    #[tokio::test]
    async fn test_help_closes_on_any_key() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_export_without_data_reports_failure() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('e'));
        assert!(app.get_status_message().unwrap().starts_with("Export failed"));
    }
}
