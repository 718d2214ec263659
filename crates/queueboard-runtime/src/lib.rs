//! Async runtime for the queue board.
//!
//! The queue store only knows how to age its entries by one minute; this
//! crate decides when that happens:
//! - `WaitTicker` - a tokio interval that calls `QueueStore::tick()`
//! - `BoardRuntime` - spawns the ticker and handles graceful shutdown
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use queueboard_queue::QueueStore;
//! use queueboard_runtime::{BoardRuntime, RuntimeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(QueueStore::new());
//!     let mut runtime = BoardRuntime::new(Arc::clone(&store), RuntimeConfig::from_env());
//!
//!     let changes = store.subscribe();
//!     runtime.start()?;
//!
//!     // Re-render whenever the board changes
//!     std::thread::spawn(move || {
//!         while let Ok(change) = changes.recv() {
//!             println!("board changed: {:?}", change);
//!         }
//!     });
//!
//!     tokio::signal::ctrl_c().await?;
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod runtime;
pub mod ticker;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use runtime::BoardRuntime;
pub use ticker::WaitTicker;
