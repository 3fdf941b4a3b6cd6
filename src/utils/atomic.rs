//! Atomic file operations
//!
//! Full rewrites of the event log go through this module so a crash during a
//! rewrite never leaves a half-written log behind.
//!
//! # Pattern
//!
//! 1. Write to a hidden temporary file next to the target
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on most filesystems)
//!
//! The temporary name is `.<file name>.tmp`, which never shares the
//! `<file name>.` prefix used by rotated backups.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Path has no file name: {0}")]
    NoFileName(String),
}

impl From<AtomicError> for io::Error {
    fn from(e: AtomicError) -> Self {
        match e {
            AtomicError::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::InvalidInput, other.to_string()),
        }
    }
}

/// Path of the temporary file used while rewriting `path`
pub fn temp_path_for(path: &Path) -> AtomicResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| AtomicError::NoFileName(path.display().to_string()))?;
    let temp_name = format!(".{}.tmp", name.to_string_lossy());
    Ok(path.with_file_name(temp_name))
}

/// Atomically replace `path` using a writer function
///
/// The writer sees an empty temp file. If it fails, the temp file is removed
/// and `path` is left untouched.
///
/// # Example
///
/// ```ignore
/// atomic_write_with("baby.log", |file| {
///     writeln!(file, "line1")?;
///     writeln!(file, "line2")?;
///     Ok(())
/// })?;
/// ```
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let result = (|| -> io::Result<()> {
        let mut file = File::create(&temp_path)?;
        write_fn(&mut file)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Remove a temp file left behind by an interrupted rewrite of `path`
///
/// Returns whether a stale file was found.
pub fn remove_stale_temp<P: AsRef<Path>>(path: P) -> AtomicResult<bool> {
    let temp_path = temp_path_for(path.as_ref())?;

    match fs::remove_file(&temp_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
