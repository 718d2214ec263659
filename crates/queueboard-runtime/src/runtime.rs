//! Main runtime manager.

use std::sync::Arc;

use queueboard_queue::QueueStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::ticker::WaitTicker;

/// Owns the aging task for a board.
///
/// The store exposes `tick()` as a plain mutation; this is the piece that
/// decides when it runs.
pub struct BoardRuntime {
    /// The board being aged.
    store: Arc<QueueStore>,
    /// Runtime configuration.
    config: RuntimeConfig,
    /// Handle to the ticker task.
    ticker_handle: Option<JoinHandle<()>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver (for cloning to the ticker).
    shutdown_rx: watch::Receiver<bool>,
    /// Whether the runtime has been started.
    started: bool,
}

impl BoardRuntime {
    /// Create a new runtime for the given board.
    pub fn new(store: Arc<QueueStore>, config: RuntimeConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            store,
            config,
            ticker_handle: None,
            shutdown_tx,
            shutdown_rx,
            started: false,
        }
    }

    /// Start the runtime (begins aging).
    ///
    /// Fails with `InvalidConfig` for a zero tick interval.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }
        self.config.validate()?;

        info!(
            tick_interval_secs = self.config.tick_interval.as_secs(),
            "starting board runtime"
        );

        // Reset the signal in case the runtime is restarted
        self.shutdown_tx.send_replace(false);

        let mut ticker = WaitTicker::new(
            Arc::clone(&self.store),
            self.config.tick_interval,
            self.shutdown_rx.clone(),
        );
        let handle = tokio::spawn(async move {
            ticker.run().await;
        });

        self.ticker_handle = Some(handle);
        self.started = true;

        debug!("board runtime started");

        Ok(())
    }

    /// Stop the runtime gracefully.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down board runtime");

        self.shutdown_tx.send(true).map_err(|e| {
            RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        if let Some(handle) = self.ticker_handle.take() {
            debug!("waiting for ticker to stop");
            handle.await.map_err(|e| {
                RuntimeError::Shutdown(format!("ticker task panicked: {}", e))
            })?;
        }

        self.started = false;

        info!("board runtime stopped");

        Ok(())
    }

    /// Get the board this runtime ages.
    pub fn store(&self) -> Arc<QueueStore> {
        Arc::clone(&self.store)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Check if the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for BoardRuntime {
    fn drop(&mut self) {
        // Send shutdown signal if still running
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queueboard_models::{Entry, Provider, ProviderId};
    use std::time::Duration;

    fn make_store() -> Arc<QueueStore> {
        let store = QueueStore::new();
        store.add_provider(Provider::new("a", "Dr. A", "General")).unwrap();
        store
            .enqueue(&ProviderId::from("a"), Entry::builder("Ana", "Cleaning").id("x").build())
            .unwrap();
        Arc::new(store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_start_stop() {
        let config = RuntimeConfig::new().with_tick_interval(Duration::from_secs(60));
        let mut runtime = BoardRuntime::new(make_store(), config);
        assert!(!runtime.is_started());

        runtime.start().unwrap();
        assert!(runtime.is_started());

        tokio::time::sleep(Duration::from_secs(190)).await;

        runtime.shutdown().await.unwrap();
        assert!(!runtime.is_started());

        let (_, x) = runtime.store().find(&"x".into()).unwrap().unwrap();
        assert_eq!(x.wait_time_minutes, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_double_start() {
        let mut runtime = BoardRuntime::new(make_store(), RuntimeConfig::default());

        runtime.start().unwrap();

        let result = runtime.start();
        assert!(matches!(result, Err(RuntimeError::AlreadyStarted)));

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_rejects_zero_interval() {
        let config = RuntimeConfig::new().with_tick_interval(Duration::ZERO);
        let mut runtime = BoardRuntime::new(make_store(), config);

        let result = runtime.start();
        assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));
        assert!(!runtime.is_started());

        tokio::time::sleep(Duration::from_secs(1)).await;
        let (_, x) = runtime.store().find(&"x".into()).unwrap().unwrap();
        assert_eq!(x.wait_time_minutes, 0);

        let result = runtime.shutdown().await;
        assert!(matches!(result, Err(RuntimeError::NotStarted)));
    }

    #[tokio::test]
    async fn test_runtime_shutdown_not_started() {
        let mut runtime = BoardRuntime::new(make_store(), RuntimeConfig::default());

        let result = runtime.shutdown().await;
        assert!(matches!(result, Err(RuntimeError::NotStarted)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_restart() {
        let config = RuntimeConfig::new().with_tick_interval(Duration::from_secs(1));
        let mut runtime = BoardRuntime::new(make_store(), config);

        runtime.start().unwrap();
        runtime.shutdown().await.unwrap();
        runtime.start().unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        runtime.shutdown().await.unwrap();

        let (_, x) = runtime.store().find(&"x".into()).unwrap().unwrap();
        assert_eq!(x.wait_time_minutes, 1);
    }
}
