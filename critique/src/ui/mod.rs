//! UI rendering module for critique.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel has its own module.

mod code_view;
mod layout;
mod markup;
mod result_view;
pub mod help;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, InputMode};
use crate::highlight::Highlighter;
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: code panel, result panel, status bar, and the
/// help overlay when open.
///
/// Viewport heights and panel rects are written back into `state` so scroll and
/// click handling on the next keypress use the current geometry.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme, highlighter: &mut Highlighter) {
    let [code, result, status_bar] = compute_layout(frame);

    state.code_viewport_height = inner_rect(code).height;
    state.panel_rects = [code, result];

    code_view::render_code(frame, code, state, theme, highlighter);
    result_view::render_result(frame, result, state, theme, highlighter);
    render_status_bar(frame, status_bar, state, theme);

    if state.input_mode == InputMode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
