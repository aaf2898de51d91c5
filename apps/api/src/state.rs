use crate::config::Config;
use crate::conversion::storage::TempStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Staging area for uploads and single-use PDF downloads.
    pub store: TempStore,
}
