//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::dispatch::CallableRegistry;
use crate::units::UnitOverrides;

/// Shared application state passed to all handlers.
///
/// Read-only after startup; each request builds its own unit registry.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<CallableRegistry>,
    /// Units applied to families a request leaves unspecified.
    pub default_units: UnitOverrides,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(registry: Arc<CallableRegistry>, config: &ServerConfig) -> Self {
        Self {
            registry,
            default_units: config.default_units.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}
