//! CLI commands and argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Solidafy pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive a pagination model over fixture pages
    Replay {
        /// Fixture file (YAML or JSON)
        #[arg(long)]
        fixture: PathBuf,

        /// Actions to run in order (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "reload")]
        actions: Vec<Action>,
    },

    /// Validate a fixture file
    Validate {
        /// Fixture file (YAML or JSON)
        #[arg(long)]
        fixture: PathBuf,
    },
}

/// Model action for `replay`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Reset the cursor and load the first page
    Reload,
    /// Start over from the initial state
    Retry,
    /// Load the next page
    More,
}

impl Action {
    /// Action name as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Retry => "retry",
            Self::More => "more",
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay_actions() {
        let cli = Cli::parse_from([
            "solidafy-pager",
            "replay",
            "--fixture",
            "pages.yaml",
            "--actions",
            "reload,more,retry",
        ]);

        match cli.command {
            Commands::Replay { fixture, actions } => {
                assert_eq!(fixture, PathBuf::from("pages.yaml"));
                assert_eq!(actions, vec![Action::Reload, Action::More, Action::Retry]);
            }
            other => panic!("Expected Replay, got {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "solidafy-pager",
            "validate",
            "--fixture",
            "pages.json",
            "--format",
            "pretty",
            "-v",
        ]);

        assert!(matches!(cli.command, Commands::Validate { .. }));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }

    #[test]
    fn test_replay_defaults_to_reload() {
        let cli = Cli::parse_from(["solidafy-pager", "replay", "--fixture", "f.json"]);
        match cli.command {
            Commands::Replay { actions, .. } => assert_eq!(actions, vec![Action::Reload]),
            other => panic!("Expected Replay, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_action() {
        let result = Cli::try_parse_from([
            "solidafy-pager",
            "replay",
            "--fixture",
            "f.json",
            "--actions",
            "reload,jump",
        ]);
        assert!(result.is_err());
    }
}
