//! Command handlers for CLI subcommands.

use std::sync::Arc;
use std::time::Duration;

use queueboard_queue::{BoardConfig, BoardStats, FilterView, QueueFilter, QueueStore};
use queueboard_runtime::{BoardRuntime, RuntimeConfig};
use tracing::{debug, info};

use crate::cli::{Commands, OutputFormat};
use crate::render::{render_board, render_stats};
use crate::seed::demo_board;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// How often `watch` drains board changes.
const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// Execute a CLI command against a freshly seeded board.
pub fn execute(command: Commands, board: &BoardConfig, runtime: RuntimeConfig) -> Result<()> {
    let store = demo_board()?;

    match command {
        Commands::Board { filter, format } => cmd_board(&store, board, filter, format),
        Commands::Stats { format } => cmd_stats(&store, board, format),
        Commands::Watch { ticks } => cmd_watch(Arc::new(store), board, runtime, ticks),
        Commands::Repl => {
            // REPL is handled separately in main
            Ok(())
        }
    }
}

fn cmd_board(
    store: &QueueStore,
    config: &BoardConfig,
    filter: QueueFilter,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = store.snapshot()?;
    let views = FilterView::new(filter)
        .with_overdue_after(config.overdue_after_minutes)
        .apply(&snapshot);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        OutputFormat::Table => {
            let full = FilterView::new(QueueFilter::All).apply(&snapshot);
            let stats = BoardStats::compute_with_capacity(&snapshot, config.capacity_per_provider);
            println!("{}\n", render_stats(&stats));
            print!("{}", render_board(&views, &full, filter));
        }
    }

    Ok(())
}

fn cmd_stats(store: &QueueStore, config: &BoardConfig, format: OutputFormat) -> Result<()> {
    let snapshot = store.snapshot()?;
    let stats = BoardStats::compute_with_capacity(&snapshot, config.capacity_per_provider);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => println!("{}", render_stats(&stats)),
    }

    Ok(())
}

/// Renders the statistics line with the configured capacity.
fn stats_line(store: &QueueStore, capacity_per_provider: u32) -> Result<String> {
    let snapshot = store.snapshot()?;
    let stats = BoardStats::compute_with_capacity(&snapshot, capacity_per_provider);
    Ok(render_stats(&stats))
}

fn cmd_watch(
    store: Arc<QueueStore>,
    config: &BoardConfig,
    runtime_config: RuntimeConfig,
    ticks: Option<u32>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let capacity = config.capacity_per_provider;

    rt.block_on(async move {
        let changes = store.subscribe();
        let mut runtime = BoardRuntime::new(Arc::clone(&store), runtime_config);

        println!("{}", stats_line(&store, capacity)?);
        runtime.start()?;
        info!(ticks = ?ticks, "watching board");

        let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
        let mut seen_ticks = 0u32;

        loop {
            tokio::select! {
                _ = refresh.tick() => {
                    let mut dirty = false;
                    for change in changes.try_iter() {
                        debug!(?change, "board changed");
                        if change.is_tick() {
                            seen_ticks += 1;
                        }
                        dirty = true;
                    }

                    if dirty {
                        println!("{}", stats_line(&store, capacity)?);
                    }

                    if ticks.is_some_and(|n| seen_ticks >= n) {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }
        }

        runtime.shutdown().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
