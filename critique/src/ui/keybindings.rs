//! Keybinding dispatcher for critique.
//!
//! Translates crossterm key, paste, and mouse events into `AppState`
//! mutations and returns a [`KeyAction`] telling the event loop what to do
//! next. The dispatcher branches first on `state.input_mode` so HelpOverlay,
//! Insert, and Normal each have an isolated handler.

use critique_core::{CopyTarget, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, InputMode, PanelFocus};

/// Signal returned from the dispatcher to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    /// Start an analysis in this mode; the loop owns the transport.
    Run(Mode),
    /// Copy this target to the clipboard.
    Copy(CopyTarget),
    Quit,
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.input_mode {
        InputMode::HelpOverlay => handle_help(key, state),
        InputMode::Normal => handle_normal(key, state),
        InputMode::Insert => handle_insert(key, state),
    }
}

/// Inserts pasted text unless the help overlay is open.
pub fn handle_paste(text: &str, state: &mut AppState) -> KeyAction {
    if state.input_mode != InputMode::HelpOverlay {
        state.insert_str(text);
        state.follow_cursor();
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('r') => KeyAction::Run(Mode::Review),
        KeyCode::Char('f') => KeyAction::Run(Mode::Fix),
        KeyCode::Char('o') => KeyAction::Run(Mode::Optimize),
        KeyCode::Char('e') => KeyAction::Run(Mode::Explain),

        KeyCode::Char('y') => KeyAction::Copy(CopyTarget::ResultJson),
        KeyCode::Char('Y') => KeyAction::Copy(CopyTarget::Code),
        KeyCode::Char('I') => KeyAction::Copy(CopyTarget::Input),

        KeyCode::Char('i') => {
            state.input_mode = InputMode::Insert;
            state.focus = PanelFocus::Code;
            state.follow_cursor();
            KeyAction::Continue
        }
        KeyCode::Tab => {
            state.cycle_language();
            KeyAction::Continue
        }
        KeyCode::Char('c') => {
            state.clear();
            KeyAction::Continue
        }
        KeyCode::Char('d') => {
            state.toggle_diff();
            KeyAction::Continue
        }

        KeyCode::Char('H') | KeyCode::Char('L') => {
            state.focus = state.focus.toggle();
            KeyAction::Continue
        }

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.input_mode = InputMode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// Scroll keys in Normal mode: j / k / g / G and Ctrl-d / Ctrl-u.
///
/// Returns `None` when the key should fall through to the rest of the
/// Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('c') if ctrl => return Some(KeyAction::Quit),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.input_mode = InputMode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            return KeyAction::Continue;
        }
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Char(ch) if !ctrl => state.insert_char(ch),
        KeyCode::Enter => state.insert_char('\n'),
        KeyCode::Tab => state.insert_str("    "),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Delete => state.delete(),
        KeyCode::Left => state.cursor_left(),
        KeyCode::Right => state.cursor_right(),
        KeyCode::Home => state.cursor_line_start(),
        KeyCode::End => state.cursor_line_end(),
        _ => return KeyAction::Continue,
    }
    state.follow_cursor();
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the panel under the pointer; the wheel scrolls the
/// focused panel (or the help overlay) by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    let help = state.input_mode == InputMode::HelpOverlay;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if !help => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [code, result] = state.panel_rects;
            if code.contains(pos) {
                state.focus = PanelFocus::Code;
            } else if result.contains(pos) {
                state.focus = PanelFocus::Result;
            }
        }
        MouseEventKind::ScrollUp if help => state.help_scroll = state.help_scroll.saturating_sub(3),
        MouseEventKind::ScrollDown if help => state.help_scroll = state.help_scroll.saturating_add(3),
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}
