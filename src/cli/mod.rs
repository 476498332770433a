//! CLI interface for psmv.
//!
//! Provides command-line argument parsing using clap.

use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, DEFAULT_STREAM_LIMIT};

/// Command-line interface for psmv.
#[derive(Parser)]
#[command(name = "psmv")]
#[command(author, version, about = "Search the Persistent Semantic Memory Vault", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search crown jewels and the residual stream for a query.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Get a crown jewel by (partial) filename.
    Jewel {
        /// Case-insensitive part of the filename.
        name: String,
    },

    /// List crown jewels, newest first.
    List {
        /// Maximum number of filenames to list.
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// Show residual stream entries, newest first.
    Stream {
        /// Only entries whose filename contains this text.
        #[arg(short, long)]
        pattern: Option<String>,

        /// Maximum number of entries to return.
        #[arg(short, long, default_value_t = DEFAULT_STREAM_LIMIT)]
        limit: usize,
    },

    /// Start the MCP server for AI editor integration.
    #[cfg(feature = "mcp")]
    Serve,

    /// Anything else prints usage.
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}
