//! Timeline scrubber
//!
//! One cell per forecast hour with the selected hour highlighted, plus the
//! playback state.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LAST_HOUR};

/// Renders the timeline into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = if app.is_playing {
        Span::styled("\u{25B6} PLAYING", Style::default().fg(Color::Green))
    } else {
        Span::styled("\u{2016} PAUSED ", Style::default().fg(Color::DarkGray))
    };

    let mut spans = vec![
        state,
        Span::raw("  "),
        Span::styled(
            format!("{:<6}", format!("T+{}H", app.selected_hour)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    spans.extend(hour_cells(app.selected_hour));

    let block = Block::default()
        .title(" Timeline ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// One cell per hour; every sixth hour is labelled so the scale is readable
fn hour_cells(selected: usize) -> Vec<Span<'static>> {
    (0..=LAST_HOUR)
        .map(|hour| {
            let symbol = if hour == selected {
                "\u{25C6}" // ◆
            } else if hour % 6 == 0 {
                "\u{2502}" // │
            } else {
                "\u{00B7}" // ·
            };
            let style = if hour == selected {
                Style::default().fg(Color::Yellow)
            } else if hour < selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(symbol, style)
        })
        .collect()
}
