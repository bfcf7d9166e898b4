use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a malformed `PORT` fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the external REST backend.
    pub backend_api_url: String,
    /// When set, logos are fetched over HTTP from this base URL.
    pub asset_base_url: Option<String>,
    /// Local asset directory used when no asset base URL is configured.
    pub asset_dir: String,
    /// Logo used when a generation request does not name one.
    pub default_logo_path: Option<String>,
    pub default_template: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            backend_api_url: env_or("BACKEND_API_URL", "http://localhost:8000/api"),
            asset_base_url: optional_env("ASSET_BASE_URL"),
            asset_dir: env_or("ASSET_DIR", "./assets"),
            default_logo_path: optional_env("DEFAULT_LOGO_PATH"),
            default_template: env_or("DEFAULT_TEMPLATE", "classic"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
