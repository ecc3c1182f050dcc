use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub struct FetchParams {
    pub catalog_url: Url,
    pub snap: String,
    pub revision: u32,
    pub download_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ListParams {
    pub catalog_url: Url,
}
