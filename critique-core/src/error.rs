//! Error types for critique-core.
//!
//! Every failure of an analysis run collapses into [`AnalysisError`], whose
//! `Display` string is exactly what the UI shows. The variants exist for
//! logging and tests; the UI surfaces only the message.

use thiserror::Error;

/// Shown when the submitted code is empty after trimming.
pub const EMPTY_CODE_MESSAGE: &str = "Please enter some code";
/// Shown when the service fails without a usable error message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process code";
/// Shown when the envelope reports `success: false` without an `error`.
pub const PROCESSING_FAILED_MESSAGE: &str = "Processing failed";
/// Shown when a run is dropped before its response arrives.
pub const CANCELLED_MESSAGE: &str = "Request was cancelled";

/// Failure of a single analysis run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The input was rejected before any request was made.
    #[error("{}", EMPTY_CODE_MESSAGE)]
    Validation,

    /// The service could not be reached, or answered with an unusable body.
    #[error("{0}")]
    Transport(String),

    /// The service answered with an explicit failure message.
    #[error("{0}")]
    Service(String),

    /// The envelope was well-formed but `data` did not fit the mode.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

impl From<TransportError> for AnalysisError {
    fn from(err: TransportError) -> Self {
        AnalysisError::Transport(err.to_string())
    }
}

/// `data` in a successful envelope does not match the declared mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Response field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Response mode `{received}` does not match requested mode `{requested}`")]
    ModeMismatch { requested: String, received: String },
}

/// The outbound call failed before a status code was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Could not reach the analysis service: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Startup configuration could not be applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Language(#[from] UnsupportedLanguage),
}

/// A language name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language `{0}`")]
pub struct UnsupportedLanguage(pub String);

/// A mode name other than review, fix, optimize, or explain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported mode `{0}`")]
pub struct UnsupportedMode(pub String);
