use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::aoi::DEFAULT_MAX_UPLOAD_BYTES;

/// Environment variable naming a TOML config file.
pub const ENV_CONFIG: &str = "NDVI_AOI_CONFIG";

const DEFAULT_SERVICE_BASE_URL: &str = "https://gis.mahapocra.gov.in/webservices";
const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("ndvi-aoi/", env!("CARGO_PKG_VERSION"));
const DEFAULT_MAP_CENTER: [f64; 2] = [18.7515, 76.7139];
const DEFAULT_MAP_ZOOM: u8 = 7;
const DEFAULT_MAP_HEIGHT: u32 = 700;
const DEFAULT_MAP_TILES: &str = "OpenStreetMap";
const DEFAULT_PAGE_TITLE: &str = "Generating NDVI";
const DEFAULT_PAGE_DESCRIPTION: &str = "Generate a Normalized Difference Vegetation Index for an Area of Interest (AOI) \
    selected by the user: pick a district, taluka and village, and upload the AOI as a GeoJSON file.";
const DEFAULT_PAGE_ABOUT: &str = "Select a village from the cascade on the right and upload a .geojson AOI.";
const MAX_ZOOM: u8 = 22;

/// Application configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub map: MapConfig,
    pub upload: UploadConfig,
    pub page: PageConfig,
}

/// Boundary web-service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_SERVICE_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Map widget settings. The WMS overlay is fixed and not configurable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: [f64; 2], // [lat, lon]
    pub zoom: u8,
    pub width: Option<u32>, // pixels; None fills the container
    pub height: u32,
    pub tiles: String, // "OpenStreetMap" or an XYZ url template
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
            width: None,
            height: DEFAULT_MAP_HEIGHT,
            tiles: DEFAULT_MAP_TILES.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self { Self { max_bytes: DEFAULT_MAX_UPLOAD_BYTES } }
}

/// Text shown around the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub description: String,
    pub about: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_PAGE_TITLE.to_string(),
            description: DEFAULT_PAGE_DESCRIPTION.to_string(),
            about: DEFAULT_PAGE_ABOUT.to_string(),
        }
    }
}

impl Config {
    /// Load from `explicit`, else from `$NDVI_AOI_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_path(explicit, std::env::var(ENV_CONFIG).ok()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("[config] read {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("[config] invalid config file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("[config] parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            bail!("[config] service.base_url must not be empty");
        }
        Url::parse(&self.service.base_url)
            .with_context(|| format!("[config] service.base_url {:?} is not a URL", self.service.base_url))?;
        if self.service.timeout_secs == 0 {
            bail!("[config] service.timeout_secs must be positive");
        }
        if self.map.zoom > MAX_ZOOM {
            bail!("[config] map.zoom must be within 0..={MAX_ZOOM}, got {}", self.map.zoom);
        }
        if self.map.height == 0 || self.map.width == Some(0) {
            bail!("[config] map width/height must be positive");
        }
        let [lat, lon] = self.map.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            bail!("[config] map.center [{lat}, {lon}] is not a valid [lat, lon]");
        }
        if self.upload.max_bytes == 0 {
            bail!("[config] upload.max_bytes must be positive");
        }
        Ok(())
    }
}

/// An explicit path wins over the environment; a blank variable counts as unset.
pub fn resolve_path(explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
