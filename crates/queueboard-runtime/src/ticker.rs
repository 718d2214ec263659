//! Wait-time ticker for the queue board.

use std::sync::Arc;
use std::time::Duration;

use queueboard_queue::QueueStore;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

/// Ages every queued entry once per interval.
pub struct WaitTicker {
    /// The board to age.
    store: Arc<QueueStore>,
    /// Time between ticks.
    period: Duration,
    /// Shutdown signal receiver.
    shutdown: watch::Receiver<bool>,
}

impl WaitTicker {
    /// Creates a new ticker.
    pub fn new(
        store: Arc<QueueStore>,
        period: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            period,
            shutdown,
        }
    }

    /// Run the tick loop until shutdown signal.
    ///
    /// The first tick fires one full period after start, so a freshly
    /// opened board does not age immediately. A zero period never ticks.
    pub async fn run(&mut self) {
        if self.period.is_zero() {
            warn!("wait ticker not started: zero tick interval");
            return;
        }

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            tick_interval_ms = self.period.as_millis(),
            "starting wait ticker"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.store.tick() {
                        Ok(()) => trace!("board aged"),
                        Err(e) => warn!(error = %e, "failed to age board"),
                    }
                }
                changed = self.shutdown.changed() => {
                    // A dropped sender also means shutdown
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("ticker received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("wait ticker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queueboard_models::{Entry, Provider, ProviderId};

    fn make_store() -> Arc<QueueStore> {
        let store = QueueStore::new();
        store.add_provider(Provider::new("a", "Dr. A", "General")).unwrap();
        store
            .enqueue(&ProviderId::from("a"), Entry::builder("Ana", "Cleaning").id("x").build())
            .unwrap();
        Arc::new(store)
    }

    fn wait_of_x(store: &QueueStore) -> u32 {
        store.find(&"x".into()).unwrap().unwrap().1.wait_time_minutes
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ages_once_per_period() {
        let store = make_store();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut ticker = WaitTicker::new(Arc::clone(&store), Duration::from_secs(60), shutdown_rx);
        let handle = tokio::spawn(async move {
            ticker.run().await;
        });

        // No tick at start
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(wait_of_x(&store), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(wait_of_x(&store), 2);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_shutdown() {
        let store = make_store();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut ticker =
            WaitTicker::new(Arc::clone(&store), Duration::from_millis(10), shutdown_rx);
        let handle = tokio::spawn(async move {
            ticker.run().await;
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        shutdown_tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_millis(100), handle).await;
        assert!(result.is_ok(), "ticker should stop after shutdown signal");

        let aged = wait_of_x(&store);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(wait_of_x(&store), aged, "no ticks after shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_zero_period_returns_without_panic() {
        let store = make_store();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut ticker = WaitTicker::new(Arc::clone(&store), Duration::ZERO, shutdown_rx);
        let handle = tokio::spawn(async move {
            ticker.run().await;
        });

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(result, Ok(Ok(()))));
        assert_eq!(wait_of_x(&store), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_when_sender_dropped() {
        let store = make_store();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut ticker = WaitTicker::new(store, Duration::from_secs(1), shutdown_rx);
        let handle = tokio::spawn(async move {
            ticker.run().await;
        });

        drop(shutdown_tx);

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok());
    }
}
