//! Help overlay renderer for critique.
//!
//! Draws a centred modal over the panels. `Clear` erases the background first,
//! inside the same `terminal.draw()` closure as the panels.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 50 columns to avoid a zero-height `Rect`.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 50 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Analysis"),
        Line::from("  r / f / o / e   Review / fix / optimize / explain the code"),
        Line::from("  Tab             Cycle the code language"),
        Line::from("  c               Clear code and result"),
        Line::from("  d               Toggle diff of input vs. fixed/optimized code"),
        Line::from(""),
        Line::from("Editing"),
        Line::from("  i               Edit code (Insert mode); paste also works here"),
        Line::from("  Esc             Back to Normal mode"),
        Line::from("  ←/→ Home/End    Move the cursor"),
        Line::from(""),
        Line::from("Clipboard"),
        Line::from("  y               Copy the result as JSON"),
        Line::from("  Y               Copy the fixed or optimized code"),
        Line::from("  I               Copy the original input"),
        Line::from(""),
        Line::from("Navigation"),
        Line::from("  j / k           Scroll down / up one line"),
        Line::from("  g / G           Jump to top / bottom"),
        Line::from("  Ctrl-d / u      Scroll half page down / up"),
        Line::from("  H / L           Move focus between code and result"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?               Open / close this help overlay"),
        Line::from("  q               Quit"),
    ])
}
