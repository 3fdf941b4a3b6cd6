//! Baby Log
//!
//! A small activity logging server: clients record feeds, diaper changes
//! and pumping sessions, then page through the history and ask for totals
//! over a time window.
//!
//! # Features
//!
//! - **Append-only log**: One JSON event per line, replayed on startup
//! - **Crash-safe rewrites**: Updates and deletions replace the file atomically
//! - **Rotation**: Size-triggered rotation with timestamped, pruned backups
//! - **Thread-Safe**: One reader/writer lock around the in-memory mirror
//! - **Pagination**: Newest-first pages with a total count
//!
//! # Modules
//!
//! - `types`: Event record and request body shape
//! - `event_store`: The append-only store, rotation and statistics
//! - `summary`: Time windows and totals for the statistics endpoint
//! - `api`: Axum router and REST handlers
//! - `config`: Command-line flags and environment
//! - `utils`: Atomic file replacement and time helpers
//!
//! # Example
//!
//! ```no_run
//! use baby_log::event_store::{EventStore, EventStoreConfig};
//! use baby_log::types::{Event, EventKind};
//! use baby_log::utils::now_local;
//!
//! let store = EventStore::open(EventStoreConfig::new("baby.log")).unwrap();
//! store.append(Event::new(now_local(), EventKind::Milk).with_amount(4.0)).unwrap();
//!
//! let (newest, total) = store.get_page(1, 10);
//! println!("{} of {} events", newest.len(), total);
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod summary;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use event_store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult};
pub use summary::{TimeWindow, Totals};
pub use types::{Event, EventInput, EventKind, Side};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
