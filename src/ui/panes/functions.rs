//! Written-functions pane
//!
//! Lists every parsed function as the writer serializes it, sorted by name,
//! so the normalized form can be compared against the source on the left.

use super::source::{clamp_scroll, highlight_source_code, pane_border_style};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the written functions, separated by blank lines
pub fn render_functions_pane(
    frame: &mut Frame,
    area: Rect,
    written: &[String],
    is_stale: bool,
    is_focused: bool,
    scroll: &mut usize,
) {
    let title = if is_stale {
        format!(" Functions ({}, last good parse) ", written.len())
    } else {
        format!(" Functions ({}) ", written.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(pane_border_style(is_focused));

    let mut lines: Vec<Line> = Vec::new();
    for (i, text) in written.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(text.lines().map(highlight_source_code));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no functions)",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }

    let visible_height = clamp_scroll(area, lines.len(), scroll);
    let visible_lines: Vec<Line> = lines
        .into_iter()
        .skip(*scroll)
        .take(visible_height)
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
