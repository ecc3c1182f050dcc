use super::Config;
use super::model::{DEFAULT_CATALOG_URL, DEFAULT_DOWNLOAD_PATH};
use crate::error::SourceDownloadError;
use config::{Config as ConfigBuilder, Environment, File};

pub const ENV_PREFIX: &str = "SOURCEDOWNLOAD";

/// Layer built-in defaults, an optional config file and environment variables
/// such as `SOURCEDOWNLOAD_CATALOG__URL`, in increasing priority.
pub fn load_config(config_path: Option<&str>) -> Result<Config, SourceDownloadError> {
    let mut builder = ConfigBuilder::builder()
        .set_default("catalog.url", DEFAULT_CATALOG_URL)?
        .set_default("download.path", DEFAULT_DOWNLOAD_PATH)?;

    if let Some(config_path) = config_path {
        builder = builder.add_source(File::with_name(config_path));
    }

    let config_builder = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    config_builder.try_deserialize().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sourcedownload.yaml");
        std::fs::write(
            &path,
            "catalog:\n  url: http://localhost:8080\ndownload:\n  path: /srv/mirror\n",
        )
        .unwrap();

        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.catalog.url, "http://localhost:8080");
        assert_eq!(config.download.path, PathBuf::from("/srv/mirror"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sourcedownload.toml");
        std::fs::write(&path, "[download]\npath = \"mirror\"\n").unwrap();

        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
        assert_eq!(config.download.path, PathBuf::from("mirror"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sourcedownload.yaml");
        std::fs::write(&path, "catalog:\n  url: http://localhost\n  retries: 3\n").unwrap();

        let result = load_config(Some(path.to_str().unwrap()));
        assert!(matches!(result, Err(SourceDownloadError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let result = load_config(Some(path.to_str().unwrap()));
        assert!(matches!(result, Err(SourceDownloadError::Config(_))));
    }
}
