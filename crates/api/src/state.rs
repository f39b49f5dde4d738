use std::sync::Arc;

use crate::config::ServerConfig;
use crate::lookup::GuestLookup;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<dyn GuestLookup>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(lookup: Arc<dyn GuestLookup>, config: ServerConfig) -> Self {
        Self {
            lookup,
            config: Arc::new(config),
        }
    }
}
