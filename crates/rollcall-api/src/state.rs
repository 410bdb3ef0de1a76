//! # Shared Application State
//!
//! One `EventService` behind an `Arc`, cloned into every handler.

use std::sync::Arc;

use rollcall_engine::EventService;
use rollcall_schedule::{Clock, SystemClock};
use rollcall_store::{MemoryStore, StateStore};

/// Shared state handed to the router.
#[derive(Clone)]
pub struct AppState {
    /// The event service all handlers delegate to.
    pub service: Arc<EventService>,
}

impl AppState {
    /// Build state over the given storage and clock ports.
    pub fn new(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            service: Arc::new(EventService::new(store, clock)),
        }
    }

    /// In-memory state on the system clock. Used by the default binary
    /// and by tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }
}
