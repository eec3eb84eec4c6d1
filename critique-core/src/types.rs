//! Owned data types shared by the orchestrator, normalizer, and view layer.
//!
//! Every type here is plain owned data (`Clone`, no lifetimes) so results can be
//! moved from the request task back to the UI thread and stored in the session
//! without borrowing from the response buffer.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{UnsupportedLanguage, UnsupportedMode};

/// The four analysis modes offered by the service.
///
/// The mode selects both the request payload and the expected response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full review: summary, rating, complexity, issues, suggestions.
    Review,
    /// Corrected version of the submitted code.
    Fix,
    /// Faster or leaner version of the submitted code.
    Optimize,
    /// Prose explanation of what the code does.
    Explain,
}

impl Mode {
    /// All modes in the order they appear in the UI.
    pub const ALL: [Mode; 4] = [Mode::Review, Mode::Fix, Mode::Optimize, Mode::Explain];

    /// Wire name sent in the request body.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Review => "review",
            Mode::Fix => "fix",
            Mode::Optimize => "optimize",
            Mode::Explain => "explain",
        }
    }

    /// Human-readable label used for headings and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Review => "Review",
            Mode::Fix => "Fix",
            Mode::Optimize => "Optimize",
            Mode::Explain => "Explain",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UnsupportedMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnsupportedMode(s.to_owned()))
    }
}

/// Source languages the service accepts.
///
/// The set is closed: anything outside it is rejected at parse time rather
/// than forwarded to the service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Python,
    Java,
    Cpp,
    C,
    Typescript,
    Go,
    Rust,
    Php,
    Ruby,
}

impl Language {
    /// All supported languages in selector order.
    pub const ALL: [Language; 10] = [
        Language::Javascript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Typescript,
        Language::Go,
        Language::Rust,
        Language::Php,
        Language::Ruby,
    ];

    /// Wire name sent in the request body.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Typescript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Javascript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Typescript => "TypeScript",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
        }
    }

    /// File extension used to pick a syntax definition for highlighting.
    pub fn extension(self) -> &'static str {
        match self {
            Language::Javascript => "js",
            Language::Python => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Typescript => "ts",
            Language::Go => "go",
            Language::Rust => "rs",
            Language::Php => "php",
            Language::Ruby => "rb",
        }
    }

    /// Infers the language from a source file's extension.
    ///
    /// Returns `None` for paths without an extension or with one that does not
    /// map to a supported language.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let lang = match ext.as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Language::Javascript,
            "py" => Language::Python,
            "java" => Language::Java,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Language::Cpp,
            "c" | "h" => Language::C,
            "ts" | "tsx" => Language::Typescript,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "php" => Language::Php,
            "rb" => Language::Ruby,
            _ => return None,
        };
        Some(lang)
    }

    /// The language after `self` in selector order (wraps around).
    pub fn next(self) -> Self {
        let idx = Language::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Language::ALL[(idx + 1) % Language::ALL.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnsupportedLanguage(s.to_owned()))
    }
}

/// Body of the single outbound call: `{code, language, mode}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: Language,
    pub mode: Mode,
}

/// Category of a review finding.
///
/// Labels outside the known set are kept verbatim in `Other` so they can
/// still be displayed (with the default badge color).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Bug,
    Security,
    Performance,
    BestPractice,
    Other(String),
}

impl IssueKind {
    /// Case-insensitive parse; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bug" => IssueKind::Bug,
            "security" => IssueKind::Security,
            "performance" => IssueKind::Performance,
            "best_practice" => IssueKind::BestPractice,
            _ => IssueKind::Other(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueKind::Bug => "bug",
            IssueKind::Security => "security",
            IssueKind::Performance => "performance",
            IssueKind::BestPractice => "best_practice",
            IssueKind::Other(raw) => raw,
        }
    }
}

impl Serialize for IssueKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How serious a review finding is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Severity {
    /// Case-insensitive parse; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Other(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Other(raw) => raw,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One finding in a review result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Result record for [`Mode::Review`].
///
/// `rating` is passed through uncapped; clamping is a display concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReport {
    pub summary: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_complexity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_complexity: Option<String>,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
}

/// A normalized service result, one variant per mode.
///
/// Serializes untagged back to the service's camelCase JSON so the
/// "copy result" action reproduces what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Review(ReviewReport),
    Fix {
        #[serde(rename = "fixedCode")]
        fixed_code: String,
    },
    Optimize {
        #[serde(rename = "optimizedCode")]
        optimized_code: String,
    },
    Explain { explanation: String },
}

impl AnalysisResult {
    /// The mode this result answers.
    pub fn mode(&self) -> Mode {
        match self {
            AnalysisResult::Review(_) => Mode::Review,
            AnalysisResult::Fix { .. } => Mode::Fix,
            AnalysisResult::Optimize { .. } => Mode::Optimize,
            AnalysisResult::Explain { .. } => Mode::Explain,
        }
    }

    /// The rewritten code carried by fix and optimize results.
    pub fn code(&self) -> Option<&str> {
        match self {
            AnalysisResult::Fix { fixed_code } => Some(fixed_code),
            AnalysisResult::Optimize { optimized_code } => Some(optimized_code),
            AnalysisResult::Review(_) | AnalysisResult::Explain { .. } => None,
        }
    }

    /// Pretty-printed JSON of the result record.
    pub fn to_json_pretty(&self) -> String {
        // Serializing owned strings and numbers cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
