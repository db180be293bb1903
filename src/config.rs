use std::path::Path;

use anyhow::{anyhow, Result};
use image::imageops::FilterType;
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::records::backends::DatabaseConfigs;
use crate::storage::backends::BackendConfigs;

static CONFIG: OnceCell<RuntimeConfig> = OnceCell::new();

/// Initialise the global runtime config from a YAML or JSON file.
pub async fn init(config_file: &Path) -> Result<()> {
    let file = tokio::fs::read(config_file).await?;

    let cfg: RuntimeConfig = match config_file.extension().and_then(|v| v.to_str()) {
        Some("json") => serde_json::from_slice(&file)?,
        Some("yaml") | Some("yml") => serde_yaml::from_slice(&file)?,
        _ => {
            return Err(anyhow!(
                "config file must have an extension of either `.json`, `.yaml` or `.yml`"
            ))
        }
    };

    let _ = CONFIG.set(cfg);
    Ok(())
}

#[inline]
pub fn config() -> &'static RuntimeConfig {
    CONFIG.get().expect("config initialised at startup")
}

#[derive(Debug, Deserialize)]
pub struct RuntimeConfig {
    /// The set blob storage backend configuration.
    pub backend: BackendConfigs,

    /// The metadata record store configuration.
    pub database: DatabaseConfigs,

    #[serde(default)]
    /// The thumbnail sizing configuration.
    pub thumbnail: ThumbnailConfig,

    #[serde(default = "default_request_timeout")]
    /// The maximum amount of time in seconds a single remote call to
    /// the blob store or record store may take before it is treated
    /// as failed.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Copy, Clone, Deserialize)]
pub struct ThumbnailConfig {
    #[serde(default = "default_max_dimension")]
    /// The maximum width thumbnails are bounded to.
    ///
    /// Defaults to `200`.
    pub max_width: u32,

    #[serde(default = "default_max_dimension")]
    /// The maximum height thumbnails are bounded to.
    ///
    /// Defaults to `200`.
    pub max_height: u32,

    #[serde(default)]
    /// The resizing filter used when downscaling.
    pub filter: ResizeFilter,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            filter: ResizeFilter::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl Default for ResizeFilter {
    fn default() -> Self {
        Self::Nearest
    }
}

impl From<ResizeFilter> for FilterType {
    fn from(value: ResizeFilter) -> Self {
        match value {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

const fn default_max_dimension() -> u32 {
    200
}

const fn default_request_timeout() -> u64 {
    30
}
