//! Risk sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::data::RiskLevel;
use crate::ui::risk_color;

/// Block characters for different risk levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing risk scores over consecutive hours.
///
/// Each cell is colored by its risk band.
pub struct RiskSparkline<'a> {
    /// Risk score for each hour, in [0, 1]
    scores: &'a [f64],
    /// Current position marker (index into scores)
    current_position: Option<usize>,
    /// Style for the current position marker, on top of the band color
    marker_style: Style,
}

impl<'a> RiskSparkline<'a> {
    pub fn new(scores: &'a [f64]) -> Self {
        Self {
            scores,
            current_position: None,
            marker_style: Style::default().bg(Color::DarkGray),
        }
    }

    pub fn current_position(mut self, pos: usize) -> Self {
        self.current_position = Some(pos);
        self
    }

    fn score_to_block(score: f64) -> char {
        let normalized = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for RiskSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, score) in self.scores.iter().take(width).enumerate() {
            let block = Self::score_to_block(*score);
            let x = area.x + i as u16;
            let y = area.y;

            let mut style = Style::default().fg(risk_color(RiskLevel::from_score(*score)));
            if self.current_position == Some(i) {
                style = style.patch(self.marker_style);
            }

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}
