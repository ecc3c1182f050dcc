use crate::error::SourceDownloadError;
use std::path::{Path, PathBuf};
use url::Url;

/// Where one source artifact comes from and where it lands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    pub local_path: PathBuf,
    pub remote_url: String,
}

impl DownloadTarget {
    /// Place the artifact at `url` inside `dir`, named after the URL's last path segment.
    pub fn new(dir: &Path, url: &str) -> Result<Self, SourceDownloadError> {
        let file_name = file_name_from_url(url)?;
        Ok(Self {
            local_path: dir.join(file_name),
            remote_url: url.to_string(),
        })
    }
}

pub fn file_name_from_url(url: &str) -> Result<String, SourceDownloadError> {
    let parsed = Url::parse(url).map_err(|e| SourceDownloadError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SourceDownloadError::InvalidUrl {
            url: url.to_string(),
            reason: "no file name in path".to_string(),
        })
}
