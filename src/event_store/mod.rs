//! Event Store Module
//!
//! This module provides the append-only activity log:
//! - `EventStore`: In-memory event list mirrored to a JSONL file
//! - `LogRotation`: Size-triggered rotation and backup pruning
//! - `EventStoreStats`: Operational statistics
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌─────────┐    ┌──────────────┐    ┌──────────────┐    ┌────────────┐
//! │ Request │───►│ size ≥ max?  │───►│ append line  │───►│ push to    │
//! │         │    │ rotate+prune │    │ to baby.log  │    │ memory     │
//! └─────────┘    └──────────────┘    └──────────────┘    └────────────┘
//!
//! Update/Delete:
//! ┌─────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ Request │───►│ write temp file, │───►│ apply change │
//! │         │    │ rename over log  │    │ in memory    │
//! └─────────┘    └──────────────────┘    └──────────────┘
//!
//! Read Path (Startup):
//! ┌───────────────┐    ┌────────────────────┐
//! │ Read baby.log │───►│ skip corrupt lines │───► Ready!
//! └───────────────┘    └────────────────────┘
//! ```

mod rotation;
mod stats;
mod store;

pub use rotation::{BackupInfo, LogRotation};
pub use stats::EventStoreStats;
pub use store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult, BYTES_PER_MB};
