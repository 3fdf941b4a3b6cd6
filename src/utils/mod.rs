//! Utility functions and helpers
//!
//! This module contains timestamp utilities and atomic file replacement.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write_with, remove_stale_temp, AtomicError, AtomicResult};
pub use time::{backup_suffix, now_local, parse_timestamp};
