//! Source pane rendering with syntax highlighting
//!
//! Shows the function file as loaded from disk, with line numbers. When the
//! last parse failed, the offending line is marked.
//!
//! The highlighter here is a character-level approximation shared with the
//! functions pane; it does not need the real lexer and never fails on text
//! the lexer would reject.

use crate::parser::lexer::is_keyword;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for Adam function source
pub(crate) fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        // Handle comments
        if c == '/' && chars.get(i + 1).is_some_and(|&(_, next)| next == '/') {
            flush_word(&mut current_word, false, &mut spans);
            spans.push(Span::styled(
                line[offset..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Handle strings, either quote style, no escapes
        if c == '"' || c == '\'' {
            flush_word(&mut current_word, false, &mut spans);
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += 1;
            }
            if end < chars.len() {
                end += 1;
            }
            let end_offset = chars.get(end).map_or(line.len(), |&(o, _)| o);
            spans.push(Span::styled(
                line[offset..end_offset].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // @name literals
        if c == '@' {
            flush_word(&mut current_word, false, &mut spans);
            let mut end = i + 1;
            while end < chars.len() && (chars[end].1.is_alphanumeric() || chars[end].1 == '_') {
                end += 1;
            }
            let end_offset = chars.get(end).map_or(line.len(), |&(o, _)| o);
            spans.push(Span::styled(
                line[offset..end_offset].to_string(),
                Style::default().fg(DEFAULT_THEME.name),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' && !(c == '.' && is_number(&current_word)) {
            flush_word(&mut current_word, c == '(', &mut spans);

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut current_word, false, &mut spans);
    Line::from(spans)
}

fn is_number(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

fn flush_word(word: &mut String, is_function: bool, spans: &mut Vec<Span<'_>>) {
    if word.is_empty() {
        return;
    }
    let style = get_word_style(word, is_function);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn get_word_style(word: &str, is_function: bool) -> Style {
    if is_keyword(word) {
        return match word {
            "true" | "false" | "empty" => Style::default().fg(DEFAULT_THEME.number),
            _ => Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD),
        };
    }
    if word.starts_with(|c: char| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else if is_function {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Border style shared by the text panes
pub(crate) fn pane_border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `scroll` so the last page stays full, returning the visible height
pub(crate) fn clamp_scroll(area: Rect, total_lines: usize, scroll: &mut usize) -> usize {
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1
    *scroll = (*scroll).min(total_lines.saturating_sub(visible_height));
    visible_height
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_line: Option<usize>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(pane_border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = clamp_scroll(area, lines.len(), scroll);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);

            let num_style = if is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line);
            if is_error {
                for span in &mut content_line.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
