//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// serprank - competitor frequency reports from SerpApi
///
/// Searches every configured keyword, folds the organic results into a
/// leaderboard of competing domains and writes a JSON or Markdown report.
///
/// Examples:
///   serprank report
///   serprank report --format markdown --output report.md --target arteva.ma
///   serprank search impression en ligne maroc
///   serprank shopping bloc notes personnalisé
///   serprank call google_trends --arguments '{"query": "goodies"}'
///   serprank --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// SerpApi key
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Location for localized results (default: Morocco)
    #[arg(long, global = true)]
    pub location: Option<String>,

    /// Language code (default: fr)
    #[arg(long, value_name = "HL", global = true)]
    pub language: Option<String>,

    /// Results per keyword (default: 10)
    #[arg(long, value_name = "COUNT", global = true)]
    pub num: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .serprank.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .serprank.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search every configured keyword and write the competitor report
    Report {
        /// Output file path for the report
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (json, markdown)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,

        /// Own domain to track across keywords
        #[arg(long, value_name = "DOMAIN")]
        target: Option<String>,
    },

    /// Print organic results for one query
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Print Google Shopping results for one query
    Shopping {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Print Google Trends data for one query
    Trends {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Date range
        #[arg(long, default_value = "today 12-m")]
        date: String,

        /// Geographic location code
        #[arg(long, default_value = "MA")]
        geo: String,
    },

    /// List the available search tools as JSON
    Tools,

    /// Invoke one search tool with JSON arguments
    Call {
        /// Tool name (google_search, google_shopping, google_trends)
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        arguments: String,
    },
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// Markdown format
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let Some(ref command) = self.command else {
            return Err("No command given. Try 'serprank report' or 'serprank --help'".to_string());
        };

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(num) = self.num {
            if num == 0 || num > 100 {
                return Err("--num must be between 1 and 100".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        match command {
            Command::Search { query }
            | Command::Shopping { query }
            | Command::Trends { query, .. } => {
                if query.iter().all(|q| q.trim().is_empty()) {
                    return Err("Query must not be empty".to_string());
                }
            }
            Command::Call { arguments, .. } => {
                match serde_json::from_str::<serde_json::Value>(arguments) {
                    Ok(value) if value.is_object() => {}
                    _ => return Err("--arguments must be a JSON object".to_string()),
                }
            }
            Command::Report { target, .. } => {
                if let Some(target) = target {
                    if target.trim().is_empty() || target.contains('/') {
                        return Err("--target must be a bare domain like 'example.com'".to_string());
                    }
                }
            }
            Command::Tools => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Join multi-word positional queries.
pub fn join_query(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}
