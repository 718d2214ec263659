//! Queueboard CLI entry point.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use queueboard_cli::cli::{Cli, Commands};
use queueboard_cli::commands;
use queueboard_cli::repl::Repl;
use queueboard_cli::seed::demo_board;
use queueboard_queue::BoardConfig;
use queueboard_runtime::RuntimeConfig;

fn main() {
    // Load .env.local if it exists (board thresholds, tick interval)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let board = BoardConfig::from_env();
    let mut runtime = RuntimeConfig::from_env();
    if let Some(secs) = cli.tick_secs {
        runtime = runtime.with_tick_interval(Duration::from_secs(secs.max(1)));
    }

    // Handle command or enter REPL
    let result = match cli.command {
        Some(Commands::Repl) | None => run_repl(board, runtime),
        Some(cmd) => commands::execute(cmd, &board, runtime),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_repl(board: BoardConfig, runtime: RuntimeConfig) -> commands::Result<()> {
    let mut repl = Repl::new(demo_board()?, board, runtime)?;
    repl.run()?;
    Ok(())
}
