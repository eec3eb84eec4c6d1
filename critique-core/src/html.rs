//! HTML rendering of a [`View`].
//!
//! Produces a self-contained fragment; styling is left to the embedding page
//! apart from the inline colors and widths the visual encoding dictates. All
//! service-provided text is escaped. The explanation view is already escaped
//! by the formatter and is inserted as-is.

use std::fmt::Write as _;

use crate::format::escape_html;
use crate::types::Mode;
use crate::view::{ReviewView, View};

const GAUGE_TRACK: &str = "#e0e0e0";
const GAUGE_FILL: &str = "#2196f3";

/// Renders `view` as an HTML fragment.
pub fn render(view: &View) -> String {
    match view {
        View::Empty => {
            "<div class=\"placeholder\">Choose a mode to analyze your code.</div>\n".to_owned()
        }
        View::Loading { mode } => {
            format!("<div class=\"loading\">Running {}…</div>\n", mode.label().to_lowercase())
        }
        View::Error { message } => {
            format!("<div class=\"error\">{}</div>\n", escape_html(message))
        }
        View::Review(review) => render_review(review),
        View::Code { mode, code } => format!(
            "<section class=\"result {}\">\n<h2>{} Code</h2>\n<pre class=\"code\"><code>{}</code></pre>\n</section>\n",
            mode.as_str(),
            code_heading(*mode),
            escape_html(code)
        ),
        View::Explanation(html) => format!(
            "<section class=\"result explain\">\n<h2>Explanation</h2>\n<div class=\"explanation\">{html}</div>\n</section>\n"
        ),
    }
}

fn code_heading(mode: Mode) -> &'static str {
    match mode {
        Mode::Fix => "Fixed",
        Mode::Optimize => "Optimized",
        Mode::Review | Mode::Explain => "Result",
    }
}

fn render_review(review: &ReviewView) -> String {
    let mut out = String::from("<section class=\"result review\">\n");

    let _ = writeln!(
        out,
        "<div class=\"rating\" style=\"background: conic-gradient({GAUGE_FILL} {pct}%, {GAUGE_TRACK} 0)\">\
         <span>{rating}/10</span></div>",
        pct = review.gauge_percent,
        rating = review.rating,
    );
    let _ = writeln!(out, "<p class=\"summary\">{}</p>", escape_html(&review.summary));

    if !review.complexity.is_empty() {
        out.push_str("<div class=\"complexity\">\n");
        for row in &review.complexity {
            let _ = writeln!(
                out,
                "<div class=\"complexity-row\"><span class=\"label\">{}</span>\
                 <span class=\"value\" style=\"color: {color}\">{}</span>\
                 <div class=\"bar\"><div class=\"fill\" style=\"width: {}%; background: {color}\"></div></div></div>",
                row.label,
                escape_html(&row.notation),
                row.width_pct,
                color = row.color,
            );
        }
        out.push_str("</div>\n");
    }

    if !review.issues.is_empty() {
        let _ = writeln!(out, "<h3>Issues ({})</h3>\n<ul class=\"issues\">", review.issues.len());
        for issue in &review.issues {
            out.push_str("<li class=\"issue\">");
            let _ = write!(
                out,
                "<span class=\"badge\" style=\"background: {}\">{}</span>\
                 <span class=\"badge\" style=\"background: {}\">{}</span>",
                issue.kind_color,
                escape_html(&issue.kind),
                issue.severity_color,
                escape_html(&issue.severity),
            );
            if let Some(line) = issue.line {
                let _ = write!(out, "<span class=\"line\">Line {line}</span>");
            }
            let _ = write!(out, "<p>{}</p>", escape_html(&issue.description));
            if let Some(suggestion) = &issue.suggestion {
                let _ = write!(
                    out,
                    "<p class=\"suggestion\">Suggestion: {}</p>",
                    escape_html(suggestion)
                );
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
    }

    if !review.suggestions.is_empty() {
        out.push_str("<h3>Suggestions</h3>\n<ul class=\"suggestions\">\n");
        for s in &review.suggestions {
            let _ = writeln!(out, "<li>{}</li>", escape_html(s));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</section>\n");
    out
}
