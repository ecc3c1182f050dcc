mod loader;
mod model;

pub use loader::{ENV_PREFIX, load_config};
pub use model::{
    CatalogConfig, Config, DEFAULT_CATALOG_URL, DEFAULT_DOWNLOAD_PATH, DownloadConfig,
};
