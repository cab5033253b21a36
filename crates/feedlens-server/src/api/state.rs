//! API shared state

use std::sync::Arc;

use feedlens_core::{Gateway, Storage};

/// Shared application state for the API
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, gateway: Gateway) -> Self {
        Self { storage, gateway }
    }
}
