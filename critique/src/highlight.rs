//! Syntax highlighting and line diffs for the code panels.
//!
//! Highlighting a large buffer on every frame at 30 FPS is wasteful, so
//! [`Highlighter`] caches the last text it highlighted per panel and only
//! re-runs syntect when the text or language changes.

use std::sync::LazyLock;

use critique_core::Language;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Unchanged lines kept around each change in the diff view.
const DIFF_CONTEXT: usize = 3;

#[derive(Default)]
struct Cached {
    key: Option<(String, Language)>,
    lines: Vec<Line<'static>>,
}

impl Cached {
    fn get(&mut self, text: &str, language: Language, theme: &str) -> &[Line<'static>] {
        let fresh = matches!(&self.key, Some((t, l)) if t == text && *l == language);
        if !fresh {
            self.lines = highlight_code(text, language, theme);
            self.key = Some((text.to_owned(), language));
        }
        &self.lines
    }
}

/// Per-panel highlight cache.
pub struct Highlighter {
    syntax_theme: &'static str,
    input: Cached,
    output: Cached,
}

impl Highlighter {
    pub fn new(syntax_theme: &'static str) -> Self {
        // Load syntect's bundled definitions up front so the first frame does not stall.
        let _ = &*PS;
        let _ = &*TS;
        Self { syntax_theme, input: Cached::default(), output: Cached::default() }
    }

    /// Highlighted lines of the code being edited.
    pub fn input(&mut self, text: &str, language: Language) -> &[Line<'static>] {
        self.input.get(text, language, self.syntax_theme)
    }

    /// Highlighted lines of a fix or optimize result.
    pub fn output(&mut self, text: &str, language: Language) -> &[Line<'static>] {
        self.output.get(text, language, self.syntax_theme)
    }
}

/// Highlights `code` line by line. Unknown syntaxes and themes degrade to
/// plain text; the result always has one `Line` per source line.
pub fn highlight_code(code: &str, language: Language, theme_name: &str) -> Vec<Line<'static>> {
    let syntax = PS
        .find_syntax_by_extension(language.extension())
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let Some(theme) = TS.themes.get(theme_name).or_else(|| TS.themes.values().next()) else {
        return code.lines().map(|l| Line::raw(l.to_owned())).collect();
    };

    let mut h = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(code)
        .map(|line| match h.highlight_line(line, &PS) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| syntect_to_span(style, text.trim_end_matches(['\n', '\r'])))
                    .collect::<Vec<_>>(),
            ),
            Err(_) => Line::raw(line.trim_end_matches(['\n', '\r']).to_owned()),
        })
        .collect()
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground is kept so the panel background stays the terminal's.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Renders a line diff from `old` to `new` with word-level emphasis.
///
/// Hunks are separated by a muted rule. Changed words inside a modified line
/// are bold; identical inputs produce a single "No changes" line.
pub fn diff_lines(old: &str, new: &str, theme: &Theme) -> Vec<Line<'static>> {
    let diff = TextDiff::from_lines(old, new);
    let mut out: Vec<Line<'static>> = Vec::new();

    for (idx, group) in diff.grouped_ops(DIFF_CONTEXT).iter().enumerate() {
        if idx > 0 {
            out.push(Line::styled("  ⋯", Style::default().fg(theme.muted)));
        }
        for op in group {
            for change in diff.iter_inline_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ("- ", theme.diff_removed),
                    ChangeTag::Insert => ("+ ", theme.diff_added),
                    ChangeTag::Equal => ("  ", theme.diff_context),
                };
                let base = Style::default().fg(color);
                let mut spans = vec![Span::styled(sign, base)];
                for (emphasized, value) in change.iter_strings_lossy() {
                    let text = value.trim_end_matches(['\n', '\r']).to_owned();
                    let style = if emphasized { base.add_modifier(Modifier::BOLD) } else { base };
                    spans.push(Span::styled(text, style));
                }
                out.push(Line::from(spans));
            }
        }
    }

    if out.is_empty() {
        out.push(Line::styled("No changes", Style::default().fg(theme.muted)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn highlight_keeps_one_line_per_source_line() {
        let lines = highlight_code("def f():\n    return 1\n", Language::Python, "base16-ocean.dark");
        assert_eq!(lines.len(), 2);
        assert_eq!(text_of(&lines[0]), "def f():");
        assert_eq!(text_of(&lines[1]), "    return 1");
    }

    #[test]
    fn unknown_theme_still_highlights() {
        let lines = highlight_code("x = 1", Language::Ruby, "no-such-theme");
        assert_eq!(text_of(&lines[0]), "x = 1");
    }

    #[test]
    fn diff_marks_changed_lines() {
        let lines = diff_lines("a = 1\nb = 2\n", "a = 1\nb = 3\n", &Theme::dark());
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["  a = 1", "- b = 2", "+ b = 3"]);
    }

    #[test]
    fn identical_inputs_have_no_changes() {
        let lines = diff_lines("same\n", "same\n", &Theme::dark());
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "No changes");
    }

    #[test]
    fn cache_rehighlights_on_language_change() {
        let mut h = Highlighter::new("base16-ocean.dark");
        assert_eq!(h.input("x", Language::Go).len(), 1);
        assert_eq!(h.input("x\ny", Language::Go).len(), 2);
        assert_eq!(h.input("x\ny", Language::Rust).len(), 2);
    }
}
