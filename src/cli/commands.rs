use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `story-studio` - safety-gated bedtime stories with an LLM judge loop.
#[derive(Parser, Debug)]
#[command(name = "story-studio")]
#[command(version = "0.1.0")]
#[command(about = "Bedtime stories, drafted, judged and revised by a model.", long_about = None)]
pub struct Cli {
    /// Explicit config file (default: ~/.story-studio/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one story
    Tell {
        /// Story request (prompted for when omitted)
        #[arg(short, long)]
        request: Option<String>,

        /// Skip the feedback pass after the story is shown
        #[arg(long)]
        no_hitl: bool,

        /// Revision rounds allowed after the first draft
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Draft temperature (0.0 - 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Print only the story
        #[arg(short, long)]
        quiet: bool,

        /// Show truncated request spec, plan and top judge issues
        #[arg(long, conflicts_with = "quiet")]
        debug: bool,
    },

    /// Inspect saved session artifacts
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Inspect or reset stored story preferences
    Prefs {
        #[command(subcommand)]
        command: PrefCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// List saved sessions, newest first
    List,
    /// Show one session's transitions, verdicts and metrics
    Show {
        /// Session id (e.g. session_1a2b3c4d5e6f)
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefCommands {
    /// Print stored preferences
    Show,
    /// Delete stored preferences
    Clear,
}
