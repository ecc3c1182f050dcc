use super::types::{ApiError, CatalogEntry, CatalogSummary, ListResponse, SnapResponse};
use crate::error::SourceDownloadError;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Client for the compliance service's snap catalog.
///
/// Requests are issued one at a time with the transport's default timeouts;
/// nothing is retried.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(http: Client, base_url: Url) -> Result<Self, SourceDownloadError> {
        if base_url.cannot_be_a_base() {
            return Err(SourceDownloadError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET <base>/v1/snaps`
    pub async fn list_snaps(&self) -> Result<Vec<CatalogSummary>, SourceDownloadError> {
        let url = self.endpoint(&["v1", "snaps"]);
        let response: ListResponse = self.get_json(url).await?;
        Ok(response.snaps)
    }

    /// `GET <base>/v1/snaps/<snap>/<revision>`
    pub async fn get_revision(
        &self,
        snap: &str,
        revision: u32,
    ) -> Result<CatalogEntry, SourceDownloadError> {
        let revision = revision.to_string();
        let url = self.endpoint(&["v1", "snaps", snap, &revision]);
        let response: SnapResponse = self.get_json(url).await?;
        Ok(response.snap)
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceDownloadError> {
        tracing::debug!(url = %url, "Querying catalog");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            let message = catalog_error_message(status, &body);
            tracing::debug!(url = %url, status = status.as_u16(), %message, "Catalog request failed");
            return Err(SourceDownloadError::Catalog {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| SourceDownloadError::Decode {
            what: "catalog response".to_string(),
            reason: e.to_string(),
        })
    }
}

fn catalog_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ApiError>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("catalog request failed with status {}", status.as_u16()))
}
