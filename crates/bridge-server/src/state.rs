use bridge_core::config::{BridgeConfig, BACKEND_URL_VAR};
use bridge_core::RouteTable;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream base address. `None` keeps the server up but fails every
    /// bridged call with a configuration error.
    pub backend_url: Option<String>,
    /// Name reported when `backend_url` is missing.
    pub backend_var: &'static str,
    pub routes: Arc<RouteTable>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(backend_url: Option<String>, routes: RouteTable) -> Self {
        Self {
            backend_url: backend_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            backend_var: BACKEND_URL_VAR,
            routes: Arc::new(routes),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(backend_url: Option<String>, config: &BridgeConfig) -> Self {
        Self::new(backend_url, config.route_table())
    }
}
