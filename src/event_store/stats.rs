//! Event Store Statistics
//!
//! Provides operational information about the event store:
//! - Live event count and active log size
//! - Backup count and total size
//! - Corrupt lines skipped at load

use std::fs;
use std::io;

use serde::Serialize;

use super::store::{EventStore, EventStoreResult};

/// Statistics about the Event Store
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventStoreStats {
    /// Events in the live (post-rotation) view
    pub event_count: usize,
    /// Size of the active log in bytes
    pub active_log_size: u64,
    /// Number of rotated backup files on disk
    pub backup_count: usize,
    /// Total size of backups in bytes
    pub backup_size: u64,
    /// Corrupt lines skipped when the log was loaded
    pub skipped_lines: usize,
    /// Rotation threshold in bytes (0 = unlimited)
    pub max_size_bytes: u64,
    /// Backup retention count (0 = unlimited)
    pub max_backups: usize,
}

impl EventStoreStats {
    /// Calculate total storage size
    pub fn total_size(&self) -> u64 {
        self.active_log_size + self.backup_size
    }

    /// Format size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

impl EventStore {
    /// Collect statistics about the live view and the files on disk
    pub fn stats(&self) -> EventStoreResult<EventStoreStats> {
        // Hold the read lock so no rotation moves files while we look.
        let entries = self.entries.read();

        let active_log_size = match fs::metadata(&self.config.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        let backups = self.rotation.list_backups()?;

        Ok(EventStoreStats {
            event_count: entries.len(),
            active_log_size,
            backup_count: backups.len(),
            backup_size: backups.iter().map(|b| b.size).sum(),
            skipped_lines: self.skipped_lines,
            max_size_bytes: self.config.max_size_bytes,
            max_backups: self.config.max_backups,
        })
    }
}
