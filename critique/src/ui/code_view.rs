//! Code input panel.
//!
//! Shows the session's code with syntax highlighting and a line-number
//! gutter. In Insert mode the terminal cursor is placed at the edit position.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, InputMode, PanelFocus};
use crate::highlight::Highlighter;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_code(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    theme: &Theme,
    highlighter: &mut Highlighter,
) {
    let is_focused = state.focus == PanelFocus::Code;
    let title = format!(" Code · {} ", state.session.language().label());
    let inner = inner_rect(area);
    frame.render_widget(panel_block(title, is_focused, theme), area);

    let code = state.session.code();
    let editing = state.input_mode == InputMode::Insert;

    if code.is_empty() && !editing {
        let hint = Line::styled(
            "Press i to type or paste code, Tab to change language",
            Style::default().fg(theme.muted),
        );
        frame.render_widget(Paragraph::new(hint), inner);
        return;
    }

    let highlighted = highlighter.input(code, state.session.language());
    let gutter = gutter_width(highlighted.len());
    let lines: Vec<Line<'static>> = highlighted
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let mut spans = vec![Span::styled(
                format!("{:>width$} ", idx + 1, width = gutter - 1),
                Style::default().fg(theme.muted),
            )];
            spans.extend(line.spans.iter().cloned());
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).scroll((state.code_scroll, 0)), inner);

    if editing {
        let (row, col) = state.cursor_row_col();
        if row >= state.code_scroll && row - state.code_scroll < inner.height {
            let x = inner.x.saturating_add(gutter as u16).saturating_add(col);
            let y = inner.y + (row - state.code_scroll);
            if x < inner.right() {
                frame.set_cursor_position(Position { x, y });
            }
        }
    }
}

/// Digits of the largest line number plus one space.
fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gutter_grows_with_line_count() {
        assert_eq!(gutter_width(0), 2);
        assert_eq!(gutter_width(9), 2);
        assert_eq!(gutter_width(10), 3);
        assert_eq!(gutter_width(1234), 5);
    }
}
