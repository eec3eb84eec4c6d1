//! Shapes the service's loosely-typed `data` object into an [`AnalysisResult`].
//!
//! Only the fields each mode needs are required; everything else defaults.
//! Unknown fields are ignored. `rating` is checked to be numeric and otherwise
//! passed through as-is.

use serde::Deserialize;
use serde_json::Value;

use crate::error::NormalizationError;
use crate::types::{AnalysisResult, Issue, IssueKind, Mode, ReviewReport, Severity};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawReview {
    summary: Option<Value>,
    rating: Option<Value>,
    time_complexity: Option<Value>,
    space_complexity: Option<Value>,
    issues: Option<Value>,
    suggestions: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIssue {
    #[serde(rename = "type")]
    kind: Option<String>,
    severity: Option<String>,
    line: Option<Value>,
    description: Option<String>,
    suggestion: Option<String>,
}

/// Validates `data` for `mode` and builds the typed result.
///
/// # Errors
///
/// Returns [`NormalizationError::MissingField`] naming the first required
/// field that is absent (or `null`), and [`NormalizationError::InvalidField`]
/// when a required field has the wrong JSON type.
pub fn normalize(mode: Mode, data: &Value) -> Result<AnalysisResult, NormalizationError> {
    if !data.is_object() {
        return Err(NormalizationError::InvalidField {
            field: "data",
            reason: "expected a JSON object".to_owned(),
        });
    }

    match mode {
        Mode::Review => normalize_review(data).map(AnalysisResult::Review),
        Mode::Fix => Ok(AnalysisResult::Fix {
            fixed_code: required_string(data, "fixedCode")?,
        }),
        Mode::Optimize => Ok(AnalysisResult::Optimize {
            optimized_code: required_string(data, "optimizedCode")?,
        }),
        Mode::Explain => Ok(AnalysisResult::Explain {
            explanation: required_string(data, "explanation")?,
        }),
    }
}

fn normalize_review(data: &Value) -> Result<ReviewReport, NormalizationError> {
    let raw: RawReview =
        serde_json::from_value(data.clone()).map_err(|e| NormalizationError::InvalidField {
            field: "data",
            reason: e.to_string(),
        })?;

    let summary = match raw.summary {
        None | Some(Value::Null) => return Err(NormalizationError::MissingField("summary")),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    };
    let rating = match raw.rating {
        None | Some(Value::Null) => return Err(NormalizationError::MissingField("rating")),
        Some(v) => numeric(&v).ok_or_else(|| NormalizationError::InvalidField {
            field: "rating",
            reason: format!("expected a number, got {v}"),
        })?,
    };

    let issues = match raw.issues {
        Some(Value::Array(items)) => items.into_iter().filter_map(issue_from_value).collect(),
        _ => Vec::new(),
    };
    let suggestions = match raw.suggestions {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(ReviewReport {
        summary,
        rating,
        time_complexity: optional_string(raw.time_complexity),
        space_complexity: optional_string(raw.space_complexity),
        issues,
        suggestions,
    })
}

/// Builds an [`Issue`] from one array entry; entries that are not objects are skipped.
fn issue_from_value(value: Value) -> Option<Issue> {
    if !value.is_object() {
        return None;
    }
    let raw: RawIssue = serde_json::from_value(value).ok()?;
    Some(Issue {
        kind: IssueKind::parse(raw.kind.as_deref().unwrap_or("")),
        severity: Severity::parse(raw.severity.as_deref().unwrap_or("")),
        line: raw.line.as_ref().and_then(numeric).map(|n| n as i64),
        description: raw.description.unwrap_or_default(),
        suggestion: raw.suggestion.filter(|s| !s.trim().is_empty()),
    })
}

fn required_string(data: &Value, field: &'static str) -> Result<String, NormalizationError> {
    match data.get(field) {
        None | Some(Value::Null) => Err(NormalizationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(NormalizationError::InvalidField {
            field,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn optional_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Accepts JSON numbers and numeric strings such as `"7.5"`.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
