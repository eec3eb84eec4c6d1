//! File-backed `tracing` subscriber.
//!
//! The TUI owns the terminal, so log output goes to `.critique/critique.log`
//! in the working directory. The filter comes from `CRITIQUE_LOG` and
//! defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CRITIQUE_LOG";
pub const LOG_DIR: &str = ".critique";
const LOG_FILE: &str = "critique.log";

/// Installs the global subscriber writing to `<dir>/critique.log`.
pub fn init(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
