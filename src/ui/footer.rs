//! Footer with target time, data source and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, SourceStatus};
use crate::data::DataSource;

/// Color for the provenance label
fn source_color(status: SourceStatus) -> Color {
    match status {
        SourceStatus::Connecting => Color::Yellow,
        SourceStatus::Resolved(DataSource::Live) => Color::Green,
        SourceStatus::Resolved(DataSource::Simulated) => Color::Magenta,
    }
}

/// Renders the footer line
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.source_status.label()),
            Style::default()
                .fg(Color::Black)
                .bg(source_color(app.source_status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            app.current_timestamp()
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
            Style::default().fg(Color::White),
        ),
    ];

    if app.probes_in_flight > 0 {
        spans.push(Span::styled(
            "  Fetching...",
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.extend([
        Span::raw("  "),
        Span::styled("\u{2190}/\u{2192}", Style::default().fg(Color::Yellow)),
        Span::raw(" Hour  "),
        Span::styled("Space", Style::default().fg(Color::Yellow)),
        Span::raw(" Play  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(" Probe  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
