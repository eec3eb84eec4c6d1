//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use critique_core::{Language, Mode};

#[derive(Debug, Parser)]
#[command(name = "critique")]
#[command(version)]
#[command(about = "Send code to an AI analysis service for review, fixes, optimization, or explanation")]
pub struct Cli {
    /// Source file to load into the editor (or to analyze with --print)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Language of the code; inferred from --file when omitted
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Analysis mode for --print: review, fix, optimize, or explain
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Run one analysis without the TUI and print the result as HTML to stdout
    #[arg(long, requires_all = ["mode", "file"])]
    pub print: bool,

    /// Base URL of the analysis service (overrides CRITIQUE_API_URL and config)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Color theme: dark or catppuccin-mocha (overrides config)
    #[arg(long)]
    pub theme: Option<String>,

    /// Config file location
    #[arg(long, env = "CRITIQUE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_requires_mode_and_file() {
        assert!(Cli::try_parse_from(["critique", "--print", "--mode", "fix"]).is_err());
        let cli =
            Cli::try_parse_from(["critique", "--print", "-m", "fix", "-f", "a.py"]).unwrap();
        assert_eq!(cli.mode, Some(Mode::Fix));
        assert!(cli.print);
    }

    #[test]
    fn unsupported_values_are_rejected() {
        assert!(Cli::try_parse_from(["critique", "--language", "cobol"]).is_err());
        assert!(Cli::try_parse_from(["critique", "--mode", "summarize"]).is_err());
        let cli = Cli::try_parse_from(["critique", "-l", "Rust"]).unwrap();
        assert_eq!(cli.language, Some(Language::Rust));
    }
}
