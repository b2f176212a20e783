//! Shared application state for axum handlers.

use std::sync::Arc;

use minermon_app::ports::DeviceBackend;

/// Application state shared across all axum handlers.
///
/// Generic over the backend to avoid dynamic dispatch. `Clone` is
/// implemented manually so the backend itself does not need to be `Clone`.
pub struct AppState<B> {
    pub device: Arc<B>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            device: Arc::clone(&self.device),
        }
    }
}

impl<B: DeviceBackend> AppState<B> {
    pub fn new(device: B) -> Self {
        Self::from_arc(Arc::new(device))
    }

    /// Use a backend that is already shared with other tasks.
    pub fn from_arc(device: Arc<B>) -> Self {
        Self { device }
    }
}
