//! Result panel: draws whatever [`View`] the session currently selects.
//!
//! Review results get a rating gauge pinned above a scrolling body with
//! complexity bars, issue badges, and suggestions. Fix and optimize results
//! show highlighted code, or a diff against the input when toggled.
//! Explanations go through the markup renderer.

use critique_core::view::ReviewView;
use critique_core::{encode, Mode, View};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::{AppState, PanelFocus};
use crate::highlight::{diff_lines, Highlighter};
use crate::theme::{rgb, Theme};
use crate::ui::layout::{inner_rect, panel_block, spinner_frame};
use crate::ui::markup::html_to_lines;

/// Width of a complexity bar in cells at 100%.
const BAR_CELLS: u16 = 20;

pub fn render_result(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    theme: &Theme,
    highlighter: &mut Highlighter,
) {
    let is_focused = state.focus == PanelFocus::Result;
    let view = View::from_session(&state.session);
    let diff = state.diff_visible();
    let inner = inner_rect(area);

    frame.render_widget(panel_block(title(&view, diff), is_focused, theme), area);

    let (body_area, lines, wrap) = match &view {
        View::Review(review) => {
            let [gauge_area, _, body] = inner.layout(&Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ]));
            frame.render_widget(rating_gauge(review, theme), gauge_area);
            (body, review_lines(review, theme), true)
        }
        View::Code { code, .. } if diff => (inner, diff_lines(state.session.code(), code, theme), false),
        View::Code { code, .. } => {
            let lines = highlighter.output(code, state.session.language()).to_vec();
            (inner, lines, false)
        }
        View::Explanation(html) if html.is_empty() => (
            inner,
            vec![Line::styled("No explanation provided.", Style::default().fg(theme.muted))],
            true,
        ),
        View::Explanation(html) => (inner, html_to_lines(html, theme), true),
        View::Loading { mode } => (inner, loading_lines(*mode, state.spinner, theme), true),
        View::Error { message } => (
            inner,
            vec![Line::styled(format!("✗ {message}"), Style::default().fg(theme.error))],
            true,
        ),
        View::Empty => (inner, empty_lines(theme), true),
    };

    state.result_viewport_height = body_area.height;
    state.result_line_count = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    let mut paragraph = Paragraph::new(lines).scroll((state.result_scroll, 0));
    if wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, body_area);
}

fn title(view: &View, diff: bool) -> String {
    match view {
        View::Code { mode, .. } if diff => format!(" Diff · input → {} ", code_label(*mode)),
        View::Code { mode, .. } => format!(" {} Code ", title_case(code_label(*mode))),
        View::Review(_) => " Review ".to_owned(),
        View::Explanation(_) => " Explanation ".to_owned(),
        View::Loading { .. } | View::Error { .. } | View::Empty => " Result ".to_owned(),
    }
}

fn code_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Fix => "fixed",
        Mode::Optimize => "optimized",
        Mode::Review | Mode::Explain => "result",
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn rating_gauge<'a>(review: &ReviewView, theme: &Theme) -> Gauge<'a> {
    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(rgb(encode::BLUE))
                .bg(theme.gauge_track)
                .add_modifier(Modifier::BOLD),
        )
        .percent(review.gauge_percent)
        .label(format!("Rating {}/10", review.rating))
}

/// Body of a review result, below the gauge.
pub fn review_lines(review: &ReviewView, theme: &Theme) -> Vec<Line<'static>> {
    let heading = Style::default().fg(theme.heading).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);
    let mut lines = vec![Line::raw(review.summary.clone())];

    if !review.complexity.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled("Complexity", heading));
        for row in &review.complexity {
            let filled = bar_cells(row.width_pct);
            let color = rgb(row.color);
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<6}", row.label)),
                Span::styled(format!("{:<12}", row.notation), Style::default().fg(color)),
                Span::styled("█".repeat(filled as usize), Style::default().fg(color)),
                Span::styled("░".repeat((BAR_CELLS - filled) as usize), muted),
            ]));
        }
    }

    if !review.issues.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled(format!("Issues ({})", review.issues.len()), heading));
        for issue in &review.issues {
            let mut header = vec![
                badge(&issue.kind, rgb(issue.kind_color)),
                Span::raw(" "),
                badge(&issue.severity, rgb(issue.severity_color)),
            ];
            if let Some(line) = issue.line {
                header.push(Span::styled(format!("  Line {line}"), muted));
            }
            lines.push(Line::from(header));
            lines.push(Line::raw(format!("  {}", issue.description)));
            if let Some(suggestion) = &issue.suggestion {
                lines.push(Line::styled(format!("  ↳ {suggestion}"), muted));
            }
        }
    }

    if !review.suggestions.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled("Suggestions", heading));
        lines.extend(review.suggestions.iter().map(|s| Line::raw(format!("  • {s}"))));
    }

    lines
}

fn badge(label: &str, bg: Color) -> Span<'static> {
    Span::styled(
        format!(" {label} "),
        Style::default().bg(bg).fg(Color::Black).add_modifier(Modifier::BOLD),
    )
}

/// Filled cells for a bar at `width_pct` percent, rounded to the nearest cell.
fn bar_cells(width_pct: u16) -> u16 {
    ((BAR_CELLS * width_pct.min(100) + 50) / 100).min(BAR_CELLS)
}

fn loading_lines(mode: Mode, tick: usize, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::raw(format!("{} Running {}…", spinner_frame(tick), mode.label().to_lowercase())),
        Line::styled("Modes are disabled until this request finishes.", Style::default().fg(theme.muted)),
    ]
}

fn empty_lines(theme: &Theme) -> Vec<Line<'static>> {
    let key = Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled("Choose a mode to analyze your code:", Style::default().fg(theme.muted)),
        Line::default(),
    ];
    lines.extend([("r", Mode::Review), ("f", Mode::Fix), ("o", Mode::Optimize), ("e", Mode::Explain)].map(
        |(k, mode)| Line::from(vec![Span::styled(format!("  {k}  "), key), Span::raw(mode.label())]),
    ));
    lines
}
