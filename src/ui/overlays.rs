//! Modal overlays: keybinding help and the coordinate prompt
//!
//! Renders centered modal overlays on top of the current view.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::app::App;

/// Renders the help overlay on top of the current view
pub fn render_help(frame: &mut Frame) {
    let overlay_area = centered_rect(50, 19, frame.area());

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        help_line("\u{2191}/k, \u{2193}/j", "Move selection up/down"),
        help_line("Enter", "Open / close details"),
        help_line("Esc", "Close details / Quit"),
        help_line("q", "Quit application"),
        Line::from(""),
        section("Timeline"),
        help_line("\u{2190}/h, \u{2192}/l", "Previous / next hour"),
        help_line("Space", "Play / pause"),
        Line::from(""),
        section("Other"),
        help_line("c", "Probe coordinates"),
        help_line("?", "Toggle this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

/// Renders the coordinate prompt with the text typed so far
pub fn render_probe_prompt(frame: &mut Frame, app: &App) {
    let overlay_area = centered_rect(56, 6, frame.area());
    frame.render_widget(Clear, overlay_area);

    let input = app.probe_input.as_deref().unwrap_or_default();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("LAT,LON ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}\u{2588}", input),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];
    lines.push(match &app.probe_error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "Enter to look up, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    });

    let block = Block::default()
        .title(" Probe coordinates ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )])
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render_to_string;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_help_overlay_renders() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render_help(frame);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("Help"), "Should render help title");
        assert!(content.contains("Timeline"), "Should show timeline section");
        assert!(content.contains("Probe coordinates"));
    }

    #[test]
    fn test_probe_prompt_shows_input_and_error() {
        let mut app = App::new();
        app.probe_input = Some("12.5,".to_string());
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("LAT,LON 12.5,"));
        assert!(content.contains("Enter to look up"));

        app.probe_error = Some("Invalid coordinates: '12.5,'".to_string());
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Invalid coordinates"));
    }

    #[test]
    fn test_help_overlay_via_app_state() {
        let mut app = App::new();
        app.state = crate::app::AppState::LocationList;
        app.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Keyboard Shortcuts"));
    }
}
