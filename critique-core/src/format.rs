//! Markdown-lite to HTML conversion for explanation text.
//!
//! Supported markup: `**bold**`, `*italic*`, `***both***`, and `` `code` ``
//! spans, blank-line paragraph breaks, and single-newline line breaks. CRLF
//! line endings are read as LF. Passes run in a fixed order (bold, italic,
//! code, paragraphs, line breaks) so a later pass never re-reads markup
//! produced by an earlier one.
//!
//! All input text is HTML-escaped before any markup pass, so the only tags in
//! the output are `<p>`, `<br>`, `<strong>`, `<em>`, and `<code>`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("bold italic pattern is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code pattern is valid"));

/// Formatted output: a sequence of `<p>` fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeHtml {
    paragraphs: Vec<String>,
}

impl SafeHtml {
    /// Each paragraph as a complete `<p>…</p>` fragment.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The concatenated fragment, ready to be inserted as markup.
    pub fn to_html(&self) -> String {
        self.paragraphs.concat()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.paragraphs {
            f.write_str(p)?;
        }
        Ok(())
    }
}

/// Converts markdown-lite text into escaped HTML paragraphs.
///
/// `None` and empty input both produce an empty [`SafeHtml`].
pub fn format_text(text: Option<&str>) -> SafeHtml {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return SafeHtml::default();
    };

    let escaped = escape_html(&text.replace("\r\n", "\n"));
    let emphasized = BOLD_ITALIC.replace_all(&escaped, "<strong><em>$1</em></strong>");
    let bolded = BOLD.replace_all(&emphasized, "<strong>$1</strong>");
    let italicized = replace_italic(&bolded);
    let coded = CODE.replace_all(&italicized, "<code>$1</code>");

    let paragraphs = coded
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", p.replace('\n', "<br>")))
        .collect();

    SafeHtml { paragraphs }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wraps `*text*` in `<em>`, line by line.
///
/// An asterisk only counts as a delimiter when neither neighbour is another
/// asterisk, so leftovers like `***` or an unclosed `**` are never split into
/// italic spans.
fn replace_italic(text: &str) -> String {
    text.split('\n').map(italicize_line).collect::<Vec<_>>().join("\n")
}

fn italicize_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let lone: Vec<usize> = (0..chars.len())
        .filter(|&i| {
            chars[i] == '*'
                && (i == 0 || chars[i - 1] != '*')
                && chars.get(i + 1) != Some(&'*')
        })
        .collect();

    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for pair in lone.chunks_exact(2) {
        let (open, close) = (pair[0], pair[1]);
        out.extend(&chars[cursor..open]);
        out.push_str("<em>");
        out.extend(&chars[open + 1..close]);
        out.push_str("</em>");
        cursor = close + 1;
    }
    out.extend(&chars[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_spans_in_order() {
        let html = format_text(Some("**a** and *b* and `c`"));
        assert_eq!(html.paragraphs().len(), 1);
        assert_eq!(
            html.to_html(),
            "<p><strong>a</strong> and <em>b</em> and <code>c</code></p>"
        );
    }

    #[test]
    fn blank_line_splits_paragraphs() {
        let html = format_text(Some("p1\n\np2"));
        assert_eq!(html.paragraphs(), ["<p>p1</p>", "<p>p2</p>"]);
    }

    #[test]
    fn crlf_text_splits_like_lf() {
        let html = format_text(Some("p1\r\n\r\np2\r\nline"));
        assert_eq!(html.paragraphs(), ["<p>p1</p>", "<p>p2<br>line</p>"]);
    }

    #[test]
    fn triple_asterisks_nest_bold_and_italic() {
        assert_eq!(
            format_text(Some("***a*** then **b**")).to_html(),
            "<p><strong><em>a</em></strong> then <strong>b</strong></p>"
        );
    }

    #[test]
    fn single_newline_becomes_break() {
        assert_eq!(format_text(Some("a\nb")).to_html(), "<p>a<br>b</p>");
    }

    #[test]
    fn empty_and_none_produce_nothing() {
        assert!(format_text(None).is_empty());
        assert!(format_text(Some("")).is_empty());
        assert!(format_text(Some("\n\n  \n\n")).is_empty());
    }

    #[test]
    fn bold_is_not_reinterpreted_as_italic() {
        assert_eq!(
            format_text(Some("**x** *y*")).to_html(),
            "<p><strong>x</strong> <em>y</em></p>"
        );
        assert_eq!(format_text(Some("a *** b")).to_html(), "<p>a *** b</p>");
    }

    #[test]
    fn unclosed_italic_stays_literal() {
        assert_eq!(format_text(Some("2 * 3")).to_html(), "<p>2 * 3</p>");
        assert_eq!(
            format_text(Some("*a*\nb*")).to_html(),
            "<p><em>a</em><br>b*</p>"
        );
    }

    #[test]
    fn html_in_input_is_escaped() {
        assert_eq!(
            format_text(Some("<script>alert('x')</script> & **<b>**")).to_html(),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; \
             <strong>&lt;b&gt;</strong></p>"
        );
    }

    #[test]
    fn code_span_keeps_escaped_content() {
        assert_eq!(
            format_text(Some("use `Vec<u8>` here")).to_html(),
            "<p>use <code>Vec&lt;u8&gt;</code> here</p>"
        );
    }

    #[test]
    fn paragraphs_are_trimmed() {
        assert_eq!(
            format_text(Some("  first  \n\n\n\n  second\n")).paragraphs(),
            ["<p>first</p>", "<p>second</p>"]
        );
    }
}
