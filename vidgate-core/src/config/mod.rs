//! Process configuration, loaded once at startup and passed down as
//! immutable values. Credentials never live here; the S3 backend reads them
//! from the environment.

#[cfg(test)]
mod tests;

use anyhow::Context;
use http::HeaderValue;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// e.g. "0.0.0.0:8080"
    pub listen: String,

    /// Override Pingora's worker thread count.
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    S3,
    Filesystem,
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Required for `backend = "s3"`.
    pub bucket: Option<String>,

    pub region: Option<String>,

    /// Custom S3-compatible endpoint (MinIO, R2, localstack).
    pub endpoint: Option<String>,

    /// Required for `backend = "filesystem"`.
    pub root: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoConfig {
    /// Store key of the one servable object.
    pub key: String,

    /// URL path the video is served from.
    #[serde(default = "default_route")]
    pub route: String,

    /// Fixed per object class, never sniffed.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_route() -> String {
    "/video".to_string()
}

fn default_content_type() -> String {
    "video/mp4".to_string()
}

#[derive(Debug, Deserialize)]
pub struct VidgateConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub video: VideoConfig,
}

impl VidgateConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;

        let config: Self =
            toml::from_str(&raw).with_context(|| format!("failed to parse config file {path}"))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.store.backend {
            StoreBackend::S3 if self.store.bucket.is_none() => {
                anyhow::bail!("s3 backend requires `store.bucket`")
            }
            StoreBackend::Filesystem if self.store.root.is_none() => {
                anyhow::bail!("filesystem backend requires `store.root`")
            }
            _ => {}
        }

        if self.video.key.is_empty() {
            anyhow::bail!("`video.key` must not be empty");
        }

        if !self.video.route.starts_with('/') {
            anyhow::bail!("`video.route` must start with '/'");
        }

        if HeaderValue::from_str(&self.video.content_type).is_err() {
            anyhow::bail!(
                "`video.content_type` is not a valid header value: {}",
                self.video.content_type
            );
        }

        Ok(())
    }
}
