//! Responsive two-panel layout for critique.
//!
//! Pure layout arithmetic plus the shared panel chrome and status bar. Called
//! inside `terminal.draw()` on every render, so every frame gets a fresh layout
//! for the current terminal size.
//!
//! At `>= 100` columns the code and result panels sit side by side; narrower
//! terminals stack them vertically. `Spacing::Overlap(1)` combined with
//! `Block::merge_borders(MergeStrategy::Fuzzy)` makes adjacent borders share a
//! single cell and merge their junction characters.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, InputMode};
use crate::theme::Theme;

const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;
const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Returns `[code, result, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    let area = frame.area();
    let [main_area, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let split = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
    } else {
        Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
    };
    let [code, result] = main_area.layout(&split.spacing(Spacing::Overlap(1)));

    [code, result, status_bar]
}

/// The inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get a thick border in `border_active`. `MergeStrategy::Fuzzy`
/// is required because `Exact` produces broken junctions when `Thick` and
/// `Plain` borders meet.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Spinner glyph for the current tick.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Renders the 1-row status bar: mode indicator, language, request state,
/// and the current notice if one is showing.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.input_mode {
        InputMode::Insert => (" INSERT ", theme.status_mode_insert),
        InputMode::Normal | InputMode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} ", state.session.language().label())),
    ];

    if let Some(mode) = state.session.active_mode() {
        spans.push(Span::raw(format!(
            " {} {}… ",
            spinner_frame(state.spinner),
            mode.label()
        )));
    }

    match &state.notice {
        Some((notice, _)) => {
            let fg = if notice.is_error { theme.notice_err } else { theme.notice_ok };
            spans.push(Span::styled(format!(" {} ", notice.text), Style::default().fg(fg)));
        }
        None => spans.push(Span::styled(" ? help ", Style::default().fg(theme.muted))),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
