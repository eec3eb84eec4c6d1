//! Startup configuration.
//!
//! Settings are resolved once at process start from, in order of precedence:
//! the command line, the `CRITIQUE_API_URL` environment variable, the TOML
//! config file, and built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::types::Language;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const REVIEW_PATH: &str = "/api/review";
pub const ENDPOINT_ENV: &str = "CRITIQUE_API_URL";
pub const DEFAULT_THEME: &str = "catppuccin-mocha";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Returns the path to the critique config file.
///
/// Prefers `$XDG_CONFIG_HOME/critique/config.toml`; falls back to
/// `~/.config/critique/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("critique").join("config.toml")
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub endpoint: Option<String>,
    pub language: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Reads the config at `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for I/O failures other than not-found and
    /// [`ConfigError::Parse`] for malformed TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read { path: path.display().to_string(), source })
            }
        };
        toml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base endpoint with trailing slashes removed.
    pub endpoint: String,
    pub timeout: Duration,
    pub language: Language,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            language: Language::default(),
            theme: DEFAULT_THEME.to_owned(),
        }
    }
}

impl Settings {
    /// Merges the sources in precedence order. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Language`] if the config names an unsupported language.
    pub fn resolve(
        cli_endpoint: Option<&str>,
        env_endpoint: Option<&str>,
        file: &FileConfig,
    ) -> Result<Self, ConfigError> {
        let endpoint = [cli_endpoint, env_endpoint, file.endpoint.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT);

        let language = match file.language.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse::<Language>()?,
            _ => Language::default(),
        };

        Ok(Self {
            endpoint: normalize_base(endpoint),
            timeout: file
                .timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            language,
            theme: file.theme.clone().unwrap_or_else(|| DEFAULT_THEME.to_owned()),
        })
    }

    /// URL of the analysis call.
    pub fn review_url(&self) -> String {
        api_url(&self.endpoint, REVIEW_PATH)
    }
}

/// Strips surrounding whitespace and trailing slashes from a base URL.
pub fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

/// Joins `base` and `path` with exactly one slash between them.
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}/{}", normalize_base(base), path.trim_start_matches('/'))
}
