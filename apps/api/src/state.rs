use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::render::LogoLoader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// HTTP or filesystem loader, chosen from `ASSET_BASE_URL` at startup.
    pub logo_loader: Arc<dyn LogoLoader>,
    /// Typed client for the external REST backend, built from `BACKEND_API_URL`.
    /// Held for the UI-facing layer; no route here calls it.
    #[allow(dead_code)]
    pub backend: BackendClient,
}
