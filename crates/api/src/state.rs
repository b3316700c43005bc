use std::sync::Arc;

use marquee_core::catalog::SharedCatalog;
use marquee_core::queries::MovieQueries;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage handle, used directly by the health check.
    pub catalog: SharedCatalog,
    /// Read-only query facade over `catalog`.
    pub queries: MovieQueries,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(catalog: SharedCatalog, config: ServerConfig) -> Self {
        Self {
            queries: MovieQueries::new(catalog.clone()),
            catalog,
            config: Arc::new(config),
        }
    }
}
