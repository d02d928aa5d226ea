//! UI rendering module for riskglobe
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Rendering reads only the
//! uniform location model and the provenance tag held by [`App`].

pub mod footer;
pub mod location_list;
pub mod location_panel;
pub mod overlays;
pub mod timeline;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};
use crate::data::RiskLevel;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // List and detail panel
            Constraint::Length(3), // Timeline
            Constraint::Length(1), // Footer
        ])
        .split(area);

    match &app.state {
        AppState::Loading => render_loading(frame, chunks[0]),
        AppState::LocationList => location_list::render(frame, app, chunks[0]),
        AppState::LocationDetail(id) => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[0]);
            location_list::render(frame, app, body[0]);
            match app.locations.find_by_id(id) {
                Some(location) => {
                    location_panel::render(frame, location, app.selected_hour, body[1])
                }
                None => location_panel::render_missing(frame, id, body[1]),
            }
        }
    }

    timeline::render(frame, app, chunks[1]);
    footer::render(frame, app, chunks[2]);

    if app.probe_input.is_some() {
        overlays::render_probe_prompt(frame, app);
    }
    if app.show_help {
        overlays::render_help(frame);
    }
}

/// Renders a loading message while the first location list is fetched
fn render_loading(frame: &mut Frame, area: Rect) {
    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Connecting to forecast service...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Color for a risk band
pub fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Moderate => Color::Yellow,
        RiskLevel::High => Color::LightRed,
        RiskLevel::Extreme => Color::Red,
    }
}

/// Color for temperature (warmer = more red, cooler = more blue)
pub fn temperature_color(temp: f64) -> Color {
    if temp >= 30.0 {
        Color::Red
    } else if temp >= 25.0 {
        Color::LightRed
    } else if temp >= 20.0 {
        Color::Yellow
    } else if temp >= 10.0 {
        Color::Green
    } else if temp >= 0.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Test helper: draws the whole UI and returns the buffer as one string
#[cfg(test)]
pub(crate) fn render_to_string(app: &App, width: u16, height: u16) -> String {
    use ratatui::{backend::TestBackend, Terminal};

    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSource, SeededSimulation, SimulationSource};
    use crate::service::LocationsResponse;

    #[test]
    fn test_loading_screen() {
        let app = App::new();
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Connecting to forecast service"));
        assert!(content.contains("CONNECTING"));
    }

    #[test]
    fn test_detail_state_renders_list_and_panel() {
        let mut app = App::new();
        app.apply_locations(LocationsResponse {
            locations: SeededSimulation::new().locations(),
            source: DataSource::Simulated,
        });
        app.state = AppState::LocationDetail("loc-0".to_string());

        let content = render_to_string(&app, 120, 30);
        assert!(content.contains("Locations"));
        assert!(content.contains("New York, USA"));
        assert!(content.contains("T+0H"));
    }

    #[test]
    fn test_risk_colors() {
        assert_eq!(risk_color(RiskLevel::Low), Color::Green);
        assert_eq!(risk_color(RiskLevel::Moderate), Color::Yellow);
        assert_eq!(risk_color(RiskLevel::High), Color::LightRed);
        assert_eq!(risk_color(RiskLevel::Extreme), Color::Red);
    }

    #[test]
    fn test_temperature_colors() {
        assert_eq!(temperature_color(35.0), Color::Red);
        assert_eq!(temperature_color(26.0), Color::LightRed);
        assert_eq!(temperature_color(21.0), Color::Yellow);
        assert_eq!(temperature_color(12.0), Color::Green);
        assert_eq!(temperature_color(5.0), Color::Cyan);
        assert_eq!(temperature_color(-5.0), Color::Blue);
    }
}
