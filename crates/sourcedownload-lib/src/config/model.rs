use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CATALOG_URL: &str = "https://sources.iotdevice.io";
pub const DEFAULT_DOWNLOAD_PATH: &str = "download";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub download: DownloadConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base URL of the compliance service
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DownloadConfig {
    /// Root directory the sources are mirrored into
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                url: DEFAULT_CATALOG_URL.to_string(),
            },
            download: DownloadConfig {
                path: PathBuf::from(DEFAULT_DOWNLOAD_PATH),
            },
        }
    }
}
