//! Central application state for critique.
//!
//! `AppState` owns the analysis [`Session`] plus everything that exists only
//! for the terminal: input mode, panel focus, scroll offsets, the insert
//! cursor, and the transient status-bar notice. No ratatui rendering logic
//! lives here; the render module reads this state and the keybinding
//! dispatcher mutates it.

use std::time::{Duration, Instant};

use critique_core::{
    AnalysisError, AnalysisRequest, AnalysisResult, Mode, Resolution, Session, Ticket,
};
use ratatui::layout::Rect;

/// How long a status-bar notice stays visible.
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Commands and navigation (default).
    #[default]
    Normal,
    /// Keystrokes edit the code input.
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel: the code being analyzed.
    #[default]
    Code,
    /// Right panel: the analysis result.
    Result,
}

impl PanelFocus {
    /// With two panels, previous and next are the same move.
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Code => PanelFocus::Result,
            PanelFocus::Result => PanelFocus::Code,
        }
    }
}

/// A transient status-bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub session: Session,
    pub input_mode: InputMode,
    pub focus: PanelFocus,

    /// Byte offset of the insert cursor in `session.code()`; always on a char boundary.
    pub cursor: usize,

    pub code_scroll: u16,
    pub result_scroll: u16,
    pub help_scroll: u16,

    /// Inner heights after borders, cached after each render for page scrolling.
    pub code_viewport_height: u16,
    pub result_viewport_height: u16,
    /// Number of rendered result lines, cached after each render for `G`.
    pub result_line_count: u16,
    /// Outer rects of the code and result panels, cached for click-to-focus.
    pub panel_rects: [Rect; 2],

    /// Result panel shows a line diff of input vs. rewritten code.
    pub show_diff: bool,
    pub notice: Option<(Notice, Instant)>,
    /// Advanced on every tick while a request is loading.
    pub spinner: usize,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        let cursor = session.code().len();
        Self {
            session,
            input_mode: InputMode::default(),
            focus: PanelFocus::default(),
            cursor,
            code_scroll: 0,
            result_scroll: 0,
            help_scroll: 0,
            code_viewport_height: 0,
            result_viewport_height: 0,
            result_line_count: 0,
            panel_rects: [Rect::default(); 2],
            show_diff: false,
            notice: None,
            spinner: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Analysis lifecycle
    // -----------------------------------------------------------------------

    /// Starts `mode` against the current input.
    ///
    /// Returns `None` while another request is loading, and when validation
    /// fails (the session already holds the message). Otherwise returns the
    /// ticket and request the caller must dispatch.
    pub fn request(&mut self, mode: Mode) -> Option<(Ticket, AnalysisRequest)> {
        if self.session.loading() {
            return None;
        }
        self.result_scroll = 0;
        self.show_diff = false;
        self.session.begin(mode).ok()
    }

    /// Applies a resolved request. Stale resolutions leave the state untouched.
    pub fn apply_outcome(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Resolution {
        let resolution = self.session.finish(ticket, outcome);
        if resolution == Resolution::Applied {
            self.result_scroll = 0;
        }
        resolution
    }

    /// Resets code, result, and error. The language is kept.
    pub fn clear(&mut self) {
        self.session.clear();
        self.cursor = 0;
        self.code_scroll = 0;
        self.result_scroll = 0;
        self.show_diff = false;
    }

    pub fn cycle_language(&mut self) {
        let next = self.session.language().next();
        self.session.set_language(next);
    }

    /// Toggles the diff view. Only fix and optimize results have code to diff.
    pub fn toggle_diff(&mut self) {
        if self.show_diff {
            self.show_diff = false;
        } else if self.session.result().and_then(AnalysisResult::code).is_some() {
            self.show_diff = true;
            self.result_scroll = 0;
        } else {
            self.notify(Notice::error("No fixed or optimized code to compare"));
        }
    }

    /// True when the diff view is on and there is still code to diff.
    pub fn diff_visible(&self) -> bool {
        self.show_diff
            && !self.session.loading()
            && self.session.result().and_then(AnalysisResult::code).is_some()
    }

    // -----------------------------------------------------------------------
    // Notices and ticks
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Expires the notice and advances the spinner as of `now`.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some((_, shown)) = &self.notice {
            if now.saturating_duration_since(*shown) >= NOTICE_TTL {
                self.notice = None;
            }
        }
        if self.session.loading() {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }

    // -----------------------------------------------------------------------
    // Code editing
    // -----------------------------------------------------------------------

    pub fn insert_char(&mut self, ch: char) {
        let cursor = self.cursor;
        self.session.code_mut().insert(cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Inserts pasted text at the cursor. CRLF line endings become LF.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let cursor = self.cursor;
        self.session.code_mut().insert_str(cursor, &text);
        self.cursor += text.len();
    }

    pub fn backspace(&mut self) {
        let Some(ch) = self.session.code()[..self.cursor].chars().next_back() else {
            return;
        };
        self.cursor -= ch.len_utf8();
        let cursor = self.cursor;
        self.session.code_mut().remove(cursor);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.session.code().len() {
            let cursor = self.cursor;
            self.session.code_mut().remove(cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(ch) = self.session.code()[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(ch) = self.session.code()[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn cursor_line_start(&mut self) {
        self.cursor = self.session.code()[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    pub fn cursor_line_end(&mut self) {
        let code = self.session.code();
        self.cursor = code[self.cursor..].find('\n').map_or(code.len(), |i| self.cursor + i);
    }

    /// Cursor position as (row, column) in characters.
    pub fn cursor_row_col(&self) -> (u16, u16) {
        let before = &self.session.code()[..self.cursor];
        let row = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count();
        (clamp_u16(row), clamp_u16(col))
    }

    /// Scrolls the code panel so the cursor row is visible.
    pub fn follow_cursor(&mut self) {
        let (row, _) = self.cursor_row_col();
        let height = self.code_viewport_height.max(1);
        if row < self.code_scroll {
            self.code_scroll = row;
        } else if row >= self.code_scroll + height {
            self.code_scroll = row + 1 - height;
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    fn focused_scroll(&mut self) -> &mut u16 {
        match self.focus {
            PanelFocus::Code => &mut self.code_scroll,
            PanelFocus::Result => &mut self.result_scroll,
        }
    }

    fn focused_viewport(&self) -> u16 {
        match self.focus {
            PanelFocus::Code => self.code_viewport_height,
            PanelFocus::Result => self.result_viewport_height,
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_sub(lines);
    }

    pub fn scroll_top(&mut self) {
        *self.focused_scroll() = 0;
    }

    /// Scrolls so the last line of the focused panel is at the bottom.
    pub fn scroll_bottom(&mut self) {
        let total = match self.focus {
            PanelFocus::Code => clamp_u16(self.session.code().lines().count()),
            PanelFocus::Result => self.result_line_count,
        };
        let bottom = total.saturating_sub(self.focused_viewport());
        *self.focused_scroll() = bottom;
    }

    /// Uses the viewport height cached from the previous render. Scrolls by at
    /// least 1 so the first frame is not a no-op.
    pub fn half_page_down(&mut self) {
        let half = self.focused_viewport() / 2;
        self.scroll_down(half.max(1));
    }

    pub fn half_page_up(&mut self) {
        let half = self.focused_viewport() / 2;
        self.scroll_up(half.max(1));
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
