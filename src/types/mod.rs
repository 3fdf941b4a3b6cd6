//! Data types for the activity log
//!
//! This module contains the event record and the request body shape used by
//! the HTTP API.

mod event;

pub use event::{Event, EventInput, EventKind, Side};
