use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Error body returned by the catalog for any non-200 response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(default, rename = "error")]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapResponse {
    pub snap: CatalogEntry,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListResponse {
    pub snaps: Vec<CatalogSummary>,
}

/// A snap revision as stored in the catalog, with everything needed to mirror its sources.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub revision: String,
    pub arch: String,
    #[serde(default)]
    pub snap_type: String,
    #[serde(default, rename = "packages_count")]
    pub package_count: i64,
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
    /// Base64 encoded snapcraft.yaml the revision was built from
    #[serde(default, rename = "snapcraft", skip_serializing_if = "Option::is_none")]
    pub manifest_base64: Option<String>,
}

impl CatalogEntry {
    /// The encoded build manifest, treating an empty string the same as an absent field.
    pub fn manifest(&self) -> Option<&str> {
        self.manifest_base64.as_deref().filter(|m| !m.is_empty())
    }

    pub fn manifest_file_name(&self) -> String {
        format!("snapcraft_{}_{}.yaml", self.name, self.revision)
    }

    pub fn source_file_count(&self) -> usize {
        self.packages.iter().map(|p| p.source_file_urls.len()).sum()
    }
}

/// Row of the catalog listing. The listing endpoint returns the same shape as a
/// full entry, so everything beyond the identifying fields is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSummary {
    pub name: String,
    pub revision: String,
    pub arch: String,
    #[serde(default)]
    pub snap_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PackageRecord {
    #[serde(default)]
    pub arch: String,
    pub binary_name: String,
    pub binary_version: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub source_version: String,
    /// Download order is the order of this list
    #[serde(default)]
    pub source_file_urls: Vec<String>,
    #[serde(default)]
    pub copyrights: Vec<Copyright>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Copyright {
    #[serde(rename = "copyright")]
    pub base64: String,
}

impl Copyright {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.base64)
    }
}
