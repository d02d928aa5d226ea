//! Location list rendering
//!
//! One line per location: name, temperature, description and risk band at
//! the hour selected on the timeline.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{risk_color, temperature_color};
use crate::app::App;
use crate::data::{RiskLevel, WeatherLocation};

/// Width of the name column
const NAME_WIDTH: usize = 20;

/// Renders the location list into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Locations ({}) ", app.locations.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.locations.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No locations available",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Keep the selection visible when the list is taller than the area
    let visible = area.height.saturating_sub(2) as usize;
    let skip = if visible > 0 && app.selected_index >= visible {
        app.selected_index + 1 - visible
    } else {
        0
    };

    let lines: Vec<Line> = app
        .locations
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(index, location)| {
            location_line(location, app.selected_hour, index == app.selected_index)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Builds one list line for a location at an hour offset
fn location_line(location: &WeatherLocation, hour: usize, is_selected: bool) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space
    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled(truncate(&location.name, NAME_WIDTH), name_style),
    ];

    match location.hour(hour) {
        Some(entry) => {
            let conditions = &entry.conditions;
            let level = RiskLevel::from_score(conditions.risk_score);
            spans.extend([
                Span::raw(" "),
                Span::styled(
                    format!("{:>4.0}\u{00B0}C", conditions.temperature),
                    Style::default().fg(temperature_color(conditions.temperature)),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:<9}", level.label()),
                    Style::default().fg(risk_color(level)),
                ),
                Span::styled(
                    conditions.description.clone(),
                    Style::default().fg(Color::Gray),
                ),
            ]);
        }
        None => spans.push(Span::styled(
            "   --\u{00B0}C",
            Style::default().fg(Color::DarkGray),
        )),
    }

    Line::from(spans)
}

/// Pads or cuts a name to exactly `width` characters
fn truncate(name: &str, width: usize) -> String {
    let count = name.chars().count();
    if count <= width {
        format!("{:<width$}", name, width = width)
    } else {
        let mut cut: String = name.chars().take(width - 1).collect();
        cut.push('\u{2026}');
        cut
    }
}
