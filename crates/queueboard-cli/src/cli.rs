//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use queueboard_queue::QueueFilter;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Queueboard - clinic waiting-queue board
#[derive(Parser, Debug)]
#[command(name = "queueboard")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Seconds between wait-time ticks
    #[arg(long, env = "QUEUEBOARD_TICK_SECS", global = true)]
    pub tick_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every provider's queue
    Board {
        /// Which entries to show (all, urgent, waiting, overdue)
        #[arg(short, long, default_value = "all")]
        filter: QueueFilter,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show board statistics
    Stats {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Age the board in real time and print statistics after every change
    Watch {
        /// Stop after this many ticks (runs until Ctrl+C if omitted)
        #[arg(short, long)]
        ticks: Option<u32>,
    },

    /// Start interactive REPL mode
    Repl,
}

/// Output format for board and stats commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
