//! Shared application state for axum handlers.

use std::sync::Arc;

use homectl_app::hub::Hub;

/// Application state shared across all axum handlers.
///
/// Generic over the pin driver, state store, and event log to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone` — only the `Arc` wrapper is
/// cloned.
pub struct AppState<D, S, L> {
    /// The hub shared with the background loops.
    pub hub: Arc<Hub<D, S, L>>,
}

impl<D, S, L> Clone for AppState<D, S, L> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<D, S, L> AppState<D, S, L> {
    /// Create the state from the pre-wrapped hub, which is also handed to
    /// the scheduler and delivery loops.
    pub fn new(hub: Arc<Hub<D, S, L>>) -> Self {
        Self { hub }
    }
}
