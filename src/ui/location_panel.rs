//! Detail panel for the selected location
//!
//! Shows the conditions at the selected hour and the risk trend for the
//! twelve hours starting there.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::widgets::sparkline::RiskSparkline;
use super::{risk_color, temperature_color};
use crate::data::{ForecastHour, RiskLevel, WeatherLocation};

/// Hours covered by the trend sparkline
pub const TREND_HOURS: usize = 12;

/// Color scheme for the panel
mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Field labels
    pub const LABEL: Color = Color::Gray;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
}

/// Renders the detail panel for `location` at `hour`
pub fn render(frame: &mut Frame, location: &WeatherLocation, hour: usize, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" {}, {} ", location.name, location.country),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(entry) = location.hour(hour) else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("No forecast for T+{}H", hour),
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Conditions
            Constraint::Length(1), // Trend label
            Constraint::Length(1), // Trend sparkline
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(condition_lines(location, entry)), chunks[0]);

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("Risk trend (next {}h)", TREND_HOURS),
            Style::default().fg(colors::HEADER),
        )),
        chunks[1],
    );

    let scores = trend_scores(location, hour);
    frame.render_widget(RiskSparkline::new(&scores).current_position(0), chunks[2]);
}

/// Renders a placeholder when the panel's location left the set
pub fn render_missing(frame: &mut Frame, id: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(Span::styled(
        format!("Location '{}' is no longer available", id),
        Style::default().fg(Color::DarkGray),
    ))
    .block(block);
    frame.render_widget(paragraph, area);
}

fn condition_lines(location: &WeatherLocation, entry: &ForecastHour) -> Vec<Line<'static>> {
    let c = &entry.conditions;
    let level = RiskLevel::from_score(c.risk_score);

    vec![
        Line::from(vec![
            Span::styled(
                format!("{} RISK", level.label()),
                Style::default()
                    .fg(risk_color(level))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({:.2})", c.risk_score),
                Style::default().fg(colors::LABEL),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("T+{}H", entry.hour_offset),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  {}", entry.timestamp.format("%a %d %b %H:%M UTC")),
                Style::default().fg(colors::LABEL),
            ),
        ]),
        Line::from(""),
        field_line(
            "Temperature",
            format!("{:.0}\u{00B0}C", c.temperature),
            temperature_color(c.temperature),
        ),
        field_line(
            "Wind",
            format!("{:.0} km/h {}", c.wind_speed, c.wind_direction),
            colors::PRIMARY,
        ),
        field_line("Humidity", format!("{:.0}%", c.humidity), colors::PRIMARY),
        field_line(
            "Precipitation",
            format!("{:.0}%", c.precipitation_probability),
            colors::PRIMARY,
        ),
        field_line("Cloud cover", format!("{:.0}%", c.cloud_cover), colors::PRIMARY),
        field_line("Conditions", c.description.clone(), colors::PRIMARY),
        field_line(
            "Position",
            format!("{:.2}, {:.2}", location.latitude, location.longitude),
            colors::LABEL,
        ),
    ]
}

fn field_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(colors::LABEL)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Risk scores for up to [`TREND_HOURS`] hours starting at `hour`
pub fn trend_scores(location: &WeatherLocation, hour: usize) -> Vec<f64> {
    location
        .forecast
        .iter()
        .skip(hour)
        .take(TREND_HOURS)
        .map(|h| h.conditions.risk_score)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SeededSimulation, SimulationSource};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(location: &WeatherLocation, hour: usize) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, location, hour, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_panel_shows_selected_hour() {
        let location = SeededSimulation::new().locations().remove(1);
        let content = draw(&location, 7);

        assert!(content.contains("London, UK"));
        assert!(content.contains("T+7H"));
        assert!(content.contains("RISK"));
        assert!(content.contains("Humidity"));
        assert!(content.contains("Risk trend"));
        assert!(content.contains(&location.forecast[7].conditions.description));
    }

    #[test]
    fn test_panel_without_hour_shows_placeholder() {
        let mut location = SeededSimulation::new().location_at(1.0, 1.0);
        location.forecast.truncate(3);
        let content = draw(&location, 10);
        assert!(content.contains("No forecast for T+10H"));
    }

    #[test]
    fn test_trend_scores_window() {
        let location = SeededSimulation::new().location_at(12.0, 34.0);
        assert_eq!(trend_scores(&location, 0).len(), 12);
        assert_eq!(trend_scores(&location, 20).len(), 4);
        assert_eq!(
            trend_scores(&location, 3)[0],
            location.forecast[3].conditions.risk_score
        );
    }
}
