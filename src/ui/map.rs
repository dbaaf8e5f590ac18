//! Location map pane.
//!
//! Draws the basemap around the resolved location with a single marker.
//! The basemap is loaded the first time this pane is rendered.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::app::App;
use crate::map::{Basemap, Viewport};

/// Render the map pane.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.location.is_loading() && app.location.location.is_some() {
        format!(" Location (zoom {}, updating) ", app.zoom)
    } else {
        format!(" Location (zoom {}) ", app.zoom)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let basemap = app.mount_map();

    let Some(location) = app.location.location else {
        let message = if app.location.is_loading() {
            "Loading location..."
        } else {
            "Location not available..."
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    // Load failures are already logged; leave the pane empty
    let Some(basemap) = basemap else {
        frame.render_widget(block, area);
        return;
    };

    let viewport = Viewport::around(location, app.zoom);
    let coastline = app.theme.coastline;
    let marker = app.theme.marker;
    let label = format!(" {:.4}, {:.4}", location.latitude, location.longitude);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds)
        .y_bounds(viewport.y_bounds)
        .paint(move |ctx| {
            match basemap.as_ref() {
                Basemap::World(resolution) => ctx.draw(&Map {
                    resolution: *resolution,
                    color: coastline,
                }),
                Basemap::Outline(lines) => {
                    for segment in lines.iter().flat_map(|line| line.windows(2)) {
                        ctx.draw(&CanvasLine::new(
                            segment[0].0,
                            segment[0].1,
                            segment[1].0,
                            segment[1].1,
                            coastline,
                        ));
                    }
                }
            }
            ctx.layer();
            ctx.draw(&Points {
                coords: &[(location.longitude, location.latitude)],
                color: marker,
            });
            ctx.print(
                location.longitude,
                location.latitude,
                Span::styled(label.clone(), Style::default().fg(marker).add_modifier(Modifier::BOLD)),
            );
        });

    frame.render_widget(canvas, area);
}
