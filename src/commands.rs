//! This module defines the command-line interface for the application using `clap`.
//!
//! It provides a `Cli` struct that represents the parsed command-line arguments,
//! and a `Commands` enum that represents the available subcommands and their
//! options.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::profile::{ExpertiseLevel, ResponseStyle};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true, color = clap::ColorChoice::Always)]
pub struct Cli {
    /// Path to the config file. Defaults to `<config_dir>/config.yaml`.
    #[arg(long, global = true, env = "PKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// The parsed subcommand and its options.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(about, long_about = None, color = clap::ColorChoice::Always)]
pub enum Commands {
    /// Ask a single question.
    ///
    /// Giving a level or a style creates (or overwrites) the user's profile
    /// before the question is answered.
    #[clap(name = "ask", alias = "a")]
    Ask {
        /// The question to be asked. If not provided, a default question is used.
        question: Option<String>,

        /// User id; defaults to `default_user_id` from the config.
        #[arg(short = 'u', long)]
        user: Option<String>,

        #[arg(short = 'l', long, value_enum)]
        level: Option<ExpertiseLevel>,

        #[arg(short = 's', long, value_enum)]
        style: Option<ResponseStyle>,

        /// Print the full answer record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive session. Type `/help` inside for commands.
    #[clap(name = "interactive", alias = "i")]
    Interactive {
        #[arg(short = 'u', long)]
        user: Option<String>,
    },

    /// Write a default config file and prompt template to the config directory.
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_profile() {
        let cli = Cli::parse_from([
            "pkr", "ask", "What is AI?", "-u", "ada", "-l", "beginner", "-s", "casual", "--json",
        ]);

        match cli.command {
            Commands::Ask {
                question,
                user,
                level,
                style,
                json,
            } => {
                assert_eq!(question.as_deref(), Some("What is AI?"));
                assert_eq!(user.as_deref(), Some("ada"));
                assert_eq!(level, Some(ExpertiseLevel::Beginner));
                assert_eq!(style, Some(ResponseStyle::Casual));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_interactive_alias_and_config() {
        let cli = Cli::parse_from(["pkr", "i", "--config", "/tmp/pkr.yaml"]);

        assert!(matches!(cli.command, Commands::Interactive { user: None }));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pkr.yaml")));
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["pkr", "ask", "-l", "guru"]).is_err());
    }
}
