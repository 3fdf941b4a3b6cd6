//! Shared application state

use crate::event_store::EventStore;

/// State shared by every handler
///
/// Built once at startup and passed to the router as `Arc<AppState>`.
pub struct AppState {
    /// The event store; it does its own locking
    pub store: EventStore,
}

impl AppState {
    /// Create a new AppState around an opened store
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }
}
