//! Event Store - append-only activity log
//!
//! The EventStore owns the in-memory list of events and mirrors it to a JSONL
//! file, one event per line, in arrival order. Every mutation reaches the
//! file before it is applied in memory, so a failed write leaves both sides
//! as they were.
//!
//! Appends go to the end of the file. Updates and deletions rewrite the whole
//! file through an atomic temp-file rename; each costs O(stored events).

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::rotation::LogRotation;
use crate::types::Event;
use crate::utils::{atomic_write_with, remove_stale_temp, AtomicError};

/// Bytes per megabyte, as used by the `--max-size` flag
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the active log file
    pub path: PathBuf,
    /// Rotate before an append once the file reaches this size (0 = never)
    pub max_size_bytes: u64,
    /// Number of rotated backups to keep (0 = keep all)
    pub max_backups: usize,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("baby.log"),
            max_size_bytes: 10 * BYTES_PER_MB,
            max_backups: 5,
        }
    }
}

impl EventStoreConfig {
    /// Create config for a log file without rotation
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_size_bytes: 0,
            max_backups: 0,
        }
    }

    /// Set the rotation threshold in bytes and the backup retention count
    pub fn with_rotation(mut self, max_size_bytes: u64, max_backups: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self.max_backups = max_backups;
        self
    }

    /// Get the active log path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the active log and its backups
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// File name of the active log; backups are named `<file name>.<suffix>`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result type for EventStore operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rotation failed: {0}")]
    Rotation(#[source] io::Error),
    #[error("entry not found")]
    NotFound,
    #[error("empty log")]
    Empty,
}

impl From<AtomicError> for EventStoreError {
    fn from(e: AtomicError) -> Self {
        EventStoreError::Io(e.into())
    }
}

/// The EventStore manages the activity log and its in-memory mirror
///
/// All reads share one lock; every write holds it exclusively for the whole
/// operation, including any file rewrite.
///
/// Known behaviours:
/// - Rotation empties the queryable view. Rotated events live on only in
///   backup files, which the read API never consults.
/// - Events sharing a timestamp cannot be told apart by key; update applies
///   to the first match in stored order.
pub struct EventStore {
    pub(super) config: EventStoreConfig,
    pub(super) rotation: LogRotation,
    pub(super) entries: RwLock<Vec<Event>>,
    /// Lines dropped as unparseable when the log was loaded
    pub(super) skipped_lines: usize,
}

impl EventStore {
    /// Open the store, replaying the log file if it exists
    ///
    /// A missing file is an empty store. Lines that fail to parse are skipped
    /// and counted in [`EventStore::skipped_lines`].
    pub fn open(mut config: EventStoreConfig) -> EventStoreResult<Self> {
        config.path = std::path::absolute(&config.path)?;

        match remove_stale_temp(&config.path) {
            Ok(true) => warn!(path = %config.path.display(), "Removed leftover temp file from an interrupted rewrite"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not remove leftover temp file"),
        }

        let (entries, skipped_lines) = Self::load(&config.path)?;

        info!(
            path = %config.path.display(),
            events = entries.len(),
            skipped = skipped_lines,
            "Loaded event log"
        );

        Ok(Self {
            rotation: LogRotation::new(config.clone()),
            config,
            entries: RwLock::new(entries),
            skipped_lines,
        })
    }

    /// Open a store at `path` without rotation
    pub fn open_path<P: AsRef<Path>>(path: P) -> EventStoreResult<Self> {
        Self::open(EventStoreConfig::new(path))
    }

    /// Read every parseable line of the log file
    fn load(path: &Path) -> EventStoreResult<(Vec<Event>, usize)> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut events = Vec::new();
        let mut skipped = 0;

        // Split on raw bytes so a line of invalid UTF-8 is skipped like any
        // other corrupt line instead of aborting the load.
        for (line_num, line_result) in reader.split(b'\n').enumerate() {
            let line = line_result?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let parsed = std::str::from_utf8(&line)
                .map_err(|e| e.to_string())
                .and_then(|text| Event::from_json_line(text).map_err(|e| e.to_string()));

            match parsed {
                Ok(event) => events.push(event),
                Err(e) => {
                    skipped += 1;
                    warn!(line = line_num + 1, error = %e, "Skipping corrupt log line");
                }
            }
        }

        Ok((events, skipped))
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Absolute path of the active log file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Number of corrupt lines skipped when the log was loaded
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Number of events in the live view
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Append an event to the end of the log
    ///
    /// Rotates first when the file has reached the configured size. The event
    /// is kept in arrival order even if its timestamp is older than the tail.
    pub fn append(&self, event: Event) -> EventStoreResult<()> {
        let mut entries = self.entries.write();

        if self.rotation.needs_rotation().map_err(EventStoreError::Rotation)? {
            let backup = self.rotation.rotate().map_err(EventStoreError::Rotation)?;
            info!(
                backup = %backup.display(),
                dropped = entries.len(),
                "Rotated event log"
            );
            entries.clear();
        }

        let mut line = event.to_json_line()?;
        line.push('\n');
        self.append_line(&line)?;

        entries.push(event);
        Ok(())
    }

    /// Write one line at the end of the file, undoing a partial write
    fn append_line(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)?;
        let len_before = file.metadata()?.len();

        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.sync_data()) {
            if let Err(trunc) = file.set_len(len_before) {
                warn!(error = %trunc, "Could not trim partial line after failed append");
            }
            return Err(e);
        }

        Ok(())
    }

    /// Replace the file with exactly the given events
    fn rewrite<'a, I>(&self, events: I) -> EventStoreResult<()>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut content = String::new();
        for event in events {
            content.push_str(&event.to_json_line()?);
            content.push('\n');
        }

        atomic_write_with(&self.config.path, |file| file.write_all(content.as_bytes()))?;
        debug!(bytes = content.len(), "Rewrote event log");
        Ok(())
    }

    /// A copy of every event, oldest first
    pub fn get_all(&self) -> Vec<Event> {
        self.entries.read().clone()
    }

    /// One page of events, newest first, plus the total event count
    ///
    /// `page` is 1-based. A page past the end is empty; `total` is always the
    /// full count.
    pub fn get_page(&self, page: usize, page_size: usize) -> (Vec<Event>, usize) {
        let entries = self.entries.read();
        let total = entries.len();
        let skip = page.saturating_sub(1).saturating_mul(page_size);

        let events = entries
            .iter()
            .rev()
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect();

        (events, total)
    }

    /// Remove every event whose timestamp matches one of `keys`
    ///
    /// Keys match by instant, whatever offset they carry. Returns the number of
    /// events removed; an empty key set is a no-op.
    pub fn delete_batch(&self, keys: &[DateTime<FixedOffset>]) -> EventStoreResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let targets: HashSet<DateTime<Utc>> = keys.iter().map(|k| k.with_timezone(&Utc)).collect();
        let mut entries = self.entries.write();

        let removed = entries
            .iter()
            .filter(|e| targets.contains(&e.instant()))
            .count();
        if removed == 0 {
            return Ok(0);
        }

        self.rewrite(entries.iter().filter(|e| !targets.contains(&e.instant())))?;
        entries.retain(|e| !targets.contains(&e.instant()));

        info!(removed, remaining = entries.len(), "Deleted events");
        Ok(removed)
    }

    /// Remove the most recently appended event
    ///
    /// "Last" means arrival order, not the largest timestamp.
    pub fn delete_last(&self) -> EventStoreResult<Event> {
        let mut entries = self.entries.write();
        let keep = entries.len().checked_sub(1).ok_or(EventStoreError::Empty)?;

        self.rewrite(entries[..keep].iter())?;
        let removed = entries.pop().ok_or(EventStoreError::Empty)?;

        info!(timestamp = %removed.timestamp, "Deleted last event");
        Ok(removed)
    }

    /// Replace the first event keyed by `key` with `event`
    ///
    /// The replacement may carry a different timestamp. Returns the event that
    /// was replaced.
    pub fn update(&self, key: &DateTime<FixedOffset>, event: Event) -> EventStoreResult<Event> {
        let mut entries = self.entries.write();
        let idx = entries
            .iter()
            .position(|e| e.is_keyed_by(key))
            .ok_or(EventStoreError::NotFound)?;

        self.rewrite(
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| if i == idx { &event } else { e }),
        )?;

        let previous = std::mem::replace(&mut entries[idx], event);
        info!(key = %key, "Updated event");
        Ok(previous)
    }
}
