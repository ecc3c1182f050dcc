use crate::error::SourceDownloadError;
use reqwest::Client;

const USER_AGENT: &str = concat!("sourcedownload/", env!("CARGO_PKG_VERSION"));

/// One client per invocation, shared by catalog queries and artifact downloads.
pub fn build_http_client() -> Result<Client, SourceDownloadError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}
