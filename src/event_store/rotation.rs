//! Log Rotation and Backup Management
//!
//! Provides functionality for:
//! - Deciding when the active log has grown past its size limit
//! - Renaming the active log to a timestamped backup
//! - Pruning the oldest backups beyond the retention count
//!
//! Backups live next to the active log as `<file name>.<YYYY-MM-DDTHH-MM-SS>`
//! in UTC, so sorting backup names lexically sorts them by creation time even
//! across daylight saving changes.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::store::EventStoreConfig;
use crate::utils::backup_suffix;

/// Upper bound on same-second disambiguators before giving up
const MAX_SAME_SECOND_BACKUPS: u32 = 999;

/// Log rotation manager for the active log file
#[derive(Debug, Clone)]
pub struct LogRotation {
    config: EventStoreConfig,
}

impl LogRotation {
    /// Create a new LogRotation manager
    pub fn new(config: EventStoreConfig) -> Self {
        Self { config }
    }

    /// Whether the next append must rotate first
    ///
    /// Always false when rotation is disabled or the file does not exist yet.
    pub fn needs_rotation(&self) -> io::Result<bool> {
        if self.config.max_size_bytes == 0 {
            return Ok(false);
        }

        match fs::metadata(&self.config.path) {
            Ok(meta) => Ok(meta.len() >= self.config.max_size_bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Rotate the active log using the current UTC time
    pub fn rotate(&self) -> io::Result<PathBuf> {
        self.rotate_at(Utc::now())
    }

    /// Rename the active log to a backup named after `now`, then prune
    ///
    /// A failed rename fails the rotation. Pruning is best effort: failures
    /// are logged and the rotation still succeeds.
    pub fn rotate_at(&self, now: DateTime<Utc>) -> io::Result<PathBuf> {
        let backup_path = self.backup_path(&now)?;
        fs::rename(&self.config.path, &backup_path)?;

        if self.config.max_backups > 0 {
            if let Err(e) = self.prune_backups(self.config.max_backups) {
                warn!(error = %e, "Error pruning backups");
            }
        }

        Ok(backup_path)
    }

    /// Pick a backup path for `now` that sorts after every existing backup
    ///
    /// Further rotations within the same second get a `.001`, `.002`, ...
    /// disambiguator numbered past the highest one on disk, so a pruned name
    /// is never reused out of order.
    fn backup_path(&self, now: &DateTime<Utc>) -> io::Result<PathBuf> {
        let base = format!("{}.{}", self.config.file_name(), backup_suffix(now));
        let dir = self.config.dir();
        let numbered_prefix = format!("{}.", base);

        let mut highest: Option<u32> = None;
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();

            let n = if name == base {
                Some(0)
            } else {
                name.strip_prefix(&numbered_prefix)
                    .filter(|rest| rest.len() == 3)
                    .and_then(|rest| rest.parse::<u32>().ok())
            };
            if n.is_some() {
                highest = highest.max(n);
            }
        }

        match highest {
            None => Ok(dir.join(base)),
            Some(n) if n < MAX_SAME_SECOND_BACKUPS => Ok(dir.join(format!("{}.{:03}", base, n + 1))),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("too many backups named {}", base),
            )),
        }
    }

    /// List all backup files, oldest first
    ///
    /// A backup is any regular file in the log's directory whose name starts
    /// with `<file name>.`.
    pub fn list_backups(&self) -> io::Result<Vec<BackupInfo>> {
        let prefix = format!("{}.", self.config.file_name());
        let mut backups = Vec::new();

        for entry in fs::read_dir(self.config.dir())? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&prefix) {
                backups.push(BackupInfo {
                    path: entry.path(),
                    size: metadata.len(),
                });
            }
        }

        // Sort by filename (which includes the timestamp)
        backups.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        Ok(backups)
    }

    /// Delete the oldest backups, keeping only the most recent `keep_count`
    ///
    /// Returns the number of backups deleted. A file that cannot be removed is
    /// logged and skipped.
    pub fn prune_backups(&self, keep_count: usize) -> io::Result<usize> {
        let backups = self.list_backups()?;

        if backups.len() <= keep_count {
            return Ok(0);
        }

        let excess = backups.len() - keep_count;
        let mut deleted = 0;

        for backup in &backups[..excess] {
            match fs::remove_file(&backup.path) {
                Ok(()) => {
                    deleted += 1;
                    info!(path = %backup.path.display(), "Deleted old backup");
                }
                Err(e) => warn!(path = %backup.path.display(), error = %e, "Could not delete old backup"),
            }
        }

        Ok(deleted)
    }
}

/// Information about a backup file
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Path to the backup file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}
