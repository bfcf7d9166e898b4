//! Best-effort logo loading.
//!
//! A logo is an optional decoration: every failure (transport error, non-2xx
//! status, missing file, empty body, unknown image format) collapses into
//! `None` at [`load_logo`], so the assembler only ever sees "logo" or "no logo".

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Asset server returned status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid asset path: {0}")]
    InvalidPath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Detects the format from the file's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub bytes: Bytes,
    pub format: ImageFormat,
}

/// Source of static assets addressed by relative path.
#[async_trait]
pub trait LogoLoader: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Bytes, LogoError>;
}

/// Loads the logo at `path`, or `None` if it cannot be used for any reason.
pub async fn load_logo(loader: &dyn LogoLoader, path: &str) -> Option<Logo> {
    let bytes = match loader.fetch(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Logo '{path}' unavailable, rendering without it: {e}");
            return None;
        }
    };

    if bytes.is_empty() {
        warn!("Logo '{path}' is empty, rendering without it");
        return None;
    }

    match ImageFormat::sniff(&bytes) {
        Some(format) => {
            debug!("Loaded logo '{path}' ({} bytes, {:?})", bytes.len(), format);
            Some(Logo { bytes, format })
        }
        None => {
            warn!("Logo '{path}' is not a PNG, JPEG or GIF image, rendering without it");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP asset server
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpLogoLoader {
    client: Client,
    base_url: String,
}

impl HttpLogoLoader {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LogoError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(10)).build()?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl LogoLoader for HttpLogoLoader {
    async fn fetch(&self, path: &str) -> Result<Bytes, LogoError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LogoError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Local asset directory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FsLogoLoader {
    root: PathBuf,
}

impl FsLogoLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `path` under the asset root; anything escaping it is rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, LogoError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(LogoError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl LogoLoader for FsLogoLoader {
    async fn fetch(&self, path: &str) -> Result<Bytes, LogoError> {
        let full_path = self.resolve(path)?;
        let data = tokio::fs::read(full_path).await?;
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(PNG_STUB), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"<svg/>"), None);
    }

    #[tokio::test]
    async fn test_fs_loader_reads_logo() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("brands")).unwrap();
        std::fs::write(dir.path().join("brands/logo.png"), PNG_STUB).unwrap();

        let loader = FsLogoLoader::new(dir.path());
        let logo = load_logo(&loader, "/brands/logo.png").await.unwrap();
        assert_eq!(logo.format, ImageFormat::Png);
        assert_eq!(logo.bytes.as_ref(), PNG_STUB);
    }

    #[tokio::test]
    async fn test_fs_loader_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsLogoLoader::new(dir.path());
        assert!(load_logo(&loader, "nope.png").await.is_none());
    }

    #[tokio::test]
    async fn test_fs_loader_rejects_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsLogoLoader::new(dir.path());
        let err = loader.fetch("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, LogoError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_empty_or_unknown_image_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.png"), b"").unwrap();
        std::fs::write(dir.path().join("logo.svg"), b"<svg/>").unwrap();

        let loader = FsLogoLoader::new(dir.path());
        assert!(load_logo(&loader, "empty.png").await.is_none());
        assert!(load_logo(&loader, "logo.svg").await.is_none());
    }

    #[tokio::test]
    async fn test_http_loader_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/assets/logo.png")
            .with_status(404)
            .create_async()
            .await;

        let loader = HttpLogoLoader::new(format!("{}/assets/", server.url())).unwrap();
        assert!(load_logo(&loader, "logo.png").await.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_loader_fetches_logo() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/assets/logo.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(PNG_STUB)
            .create_async()
            .await;

        let loader = HttpLogoLoader::new(format!("{}/assets", server.url())).unwrap();
        let logo = load_logo(&loader, "/logo.png").await.unwrap();
        assert_eq!(logo.format, ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_http_loader_unreachable_host_is_none() {
        let loader = HttpLogoLoader::new("http://127.0.0.1:9").unwrap();
        assert!(load_logo(&loader, "logo.png").await.is_none());
    }
}
