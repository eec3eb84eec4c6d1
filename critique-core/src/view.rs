//! View selection for the result area.
//!
//! [`View::from_session`] is a pure projection of the session: it decides what
//! the result area shows and precomputes every presentation value (gauge
//! percent, bar widths, badge colors, formatted explanation) so renderers only
//! lay things out.

use crate::encode::{self, Rgb};
use crate::format::{format_text, SafeHtml};
use crate::session::Session;
use crate::types::{AnalysisResult, Mode, ReviewReport};

/// What the result area displays.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Nothing has been run since start or the last clear.
    Empty,
    Loading { mode: Mode },
    Error { message: String },
    Review(ReviewView),
    /// Fix and optimize results: the rewritten code, shown verbatim.
    Code { mode: Mode, code: String },
    Explanation(SafeHtml),
}

/// Presentation values for a review result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub summary: String,
    pub rating: f64,
    /// Filled share of the rating gauge, `rating × 10` clamped to `0..=100`.
    pub gauge_percent: u16,
    /// Time then space; rows are omitted when the service sent no value.
    pub complexity: Vec<ComplexityRow>,
    pub issues: Vec<IssueRow>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityRow {
    pub label: &'static str,
    pub notation: String,
    pub color: Rgb,
    pub width_pct: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueRow {
    pub kind: String,
    pub kind_color: Rgb,
    pub severity: String,
    pub severity_color: Rgb,
    pub line: Option<i64>,
    pub description: String,
    pub suggestion: Option<String>,
}

impl View {
    pub fn from_session(session: &Session) -> Self {
        if let Some(mode) = session.active_mode() {
            return View::Loading { mode };
        }
        if let Some(message) = session.error() {
            return View::Error { message: message.to_owned() };
        }
        match session.result() {
            Some(result) => View::from_result(result),
            None => View::Empty,
        }
    }

    pub fn from_result(result: &AnalysisResult) -> Self {
        match result {
            AnalysisResult::Review(report) => View::Review(ReviewView::new(report)),
            AnalysisResult::Fix { fixed_code } => {
                View::Code { mode: Mode::Fix, code: fixed_code.clone() }
            }
            AnalysisResult::Optimize { optimized_code } => {
                View::Code { mode: Mode::Optimize, code: optimized_code.clone() }
            }
            AnalysisResult::Explain { explanation } => {
                View::Explanation(format_text(Some(explanation)))
            }
        }
    }
}

impl ReviewView {
    pub fn new(report: &ReviewReport) -> Self {
        let complexity = [
            ("Time", report.time_complexity.as_deref()),
            ("Space", report.space_complexity.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, notation)| {
            notation.map(|n| ComplexityRow {
                label,
                notation: n.to_owned(),
                color: encode::complexity_color(Some(n)),
                width_pct: encode::complexity_width(Some(n)),
            })
        })
        .collect();

        let issues = report
            .issues
            .iter()
            .map(|issue| IssueRow {
                kind: issue.kind.as_str().to_owned(),
                kind_color: encode::issue_kind_color(Some(issue.kind.as_str())),
                severity: issue.severity.as_str().to_owned(),
                severity_color: encode::severity_color(Some(issue.severity.as_str())),
                line: issue.line,
                description: issue.description.clone(),
                suggestion: issue.suggestion.clone(),
            })
            .collect();

        Self {
            summary: report.summary.clone(),
            rating: report.rating,
            gauge_percent: gauge_percent(report.rating),
            complexity,
            issues,
            suggestions: report.suggestions.clone(),
        }
    }
}

/// `rating × 10` as a whole percent, clamped for display.
pub fn gauge_percent(rating: f64) -> u16 {
    if rating.is_nan() {
        return 0;
    }
    (rating * 10.0).round().clamp(0.0, 100.0) as u16
}

/// Text a copy action places on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    /// The normalized result record as pretty JSON.
    ResultJson,
    /// The rewritten code of a fix or optimize result.
    Code,
    /// The code as submitted.
    Input,
}

impl CopyTarget {
    pub fn label(self) -> &'static str {
        match self {
            CopyTarget::ResultJson => "result JSON",
            CopyTarget::Code => "code",
            CopyTarget::Input => "original input",
        }
    }
}

/// Returns the text for `target`, or `None` when there is nothing to copy.
pub fn copy_text(session: &Session, target: CopyTarget) -> Option<String> {
    match target {
        CopyTarget::ResultJson => session.result().map(AnalysisResult::to_json_pretty),
        CopyTarget::Code => session.result().and_then(AnalysisResult::code).map(str::to_owned),
        CopyTarget::Input => Some(session.code().to_owned()).filter(|c| !c.trim().is_empty()),
    }
}
