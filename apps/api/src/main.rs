mod backend;
mod config;
mod cv;
mod errors;
mod render;
mod routes;
mod state;
mod template;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::render::{FsLogoLoader, HttpLogoLoader, LogoLoader};
use crate::routes::build_router;
use crate::state::AppState;
use crate::template::presets;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a malformed PORT)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting back-office API v{}", env!("CARGO_PKG_VERSION"));

    if presets::find(&config.default_template).is_none() {
        anyhow::bail!(
            "DEFAULT_TEMPLATE '{}' is not a known template",
            config.default_template
        );
    }

    // Logo assets: HTTP when an asset server is configured, local directory otherwise
    let logo_loader: Arc<dyn LogoLoader> = match &config.asset_base_url {
        Some(base_url) => {
            info!("Loading logos from {base_url}");
            Arc::new(HttpLogoLoader::new(base_url.clone())?)
        }
        None => {
            info!("Loading logos from {}", config.asset_dir);
            Arc::new(FsLogoLoader::new(&config.asset_dir))
        }
    };

    let backend = BackendClient::new(config.backend_api_url.clone())?;
    info!("Backend client initialized ({})", config.backend_api_url);

    // Build app state
    let state = AppState {
        config: config.clone(),
        logo_loader,
        backend,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
