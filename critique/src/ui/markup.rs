//! Renders formatter output as styled terminal lines.
//!
//! [`SafeHtml`] contains only `<p>`, `<br>`, `<strong>`, `<em>`, and `<code>`
//! plus escaped text, so a tag scanner is enough: tags toggle modifiers and
//! entities are decoded back to characters for display. Paragraphs are
//! separated by one blank line.

use critique_core::SafeHtml;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::Theme;

#[derive(Clone, Copy, Default)]
struct Inline {
    bold: bool,
    italic: bool,
    code: bool,
}

impl Inline {
    fn style(self, theme: &Theme) -> Style {
        let mut style = Style::default();
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.code {
            style = style.fg(theme.inline_code);
        }
        style
    }
}

pub fn html_to_lines(html: &SafeHtml, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, paragraph) in html.paragraphs().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        let body = paragraph
            .strip_prefix("<p>")
            .and_then(|p| p.strip_suffix("</p>"))
            .unwrap_or(paragraph);
        lines.extend(body.split("<br>").map(|row| inline_line(row, theme)));
    }
    lines
}

fn inline_line(row: &str, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    let mut state = Inline::default();
    let mut rest = row;

    while !rest.is_empty() {
        let next_tag = rest.find('<').unwrap_or(rest.len());
        if next_tag > 0 {
            spans.push(Span::styled(unescape(&rest[..next_tag]), state.style(theme)));
            rest = &rest[next_tag..];
            continue;
        }
        let Some(end) = rest.find('>') else {
            spans.push(Span::styled(unescape(rest), state.style(theme)));
            break;
        };
        match &rest[1..end] {
            "strong" => state.bold = true,
            "/strong" => state.bold = false,
            "em" => state.italic = true,
            "/em" => state.italic = false,
            "code" => state.code = true,
            "/code" => state.code = false,
            _ => {}
        }
        rest = &rest[end + 1..];
    }
    Line::from(spans)
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use critique_core::format_text;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect()).collect()
    }

    #[test]
    fn paragraphs_and_breaks_become_lines() {
        let lines = html_to_lines(&format_text(Some("one\ntwo\n\nthree")), &Theme::dark());
        assert_eq!(texts(&lines), vec!["one", "two", "", "three"]);
    }

    #[test]
    fn inline_markup_sets_modifiers() {
        let theme = Theme::dark();
        let lines = html_to_lines(&format_text(Some("**a** *b* `c`")), &theme);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "a");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[2].content, "b");
        assert!(spans[2].style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(spans[4].content, "c");
        assert_eq!(spans[4].style.fg, Some(theme.inline_code));
    }

    #[test]
    fn escaped_text_is_shown_literally() {
        let lines = html_to_lines(&format_text(Some("if a < b && c > \"d\" 'e'")), &Theme::dark());
        assert_eq!(texts(&lines), vec!["if a < b && c > \"d\" 'e'"]);
    }

    #[test]
    fn literal_entity_text_round_trips() {
        let lines = html_to_lines(&format_text(Some("&lt; stays")), &Theme::dark());
        assert_eq!(texts(&lines), vec!["&lt; stays"]);
    }
}
