use crate::catalog::{CatalogClient, CatalogEntry, PackageRecord};
use crate::download::{DownloadTarget, FileDownloader, write_atomic};
use crate::error::SourceDownloadError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};

const MANIFEST_MODE: u32 = 0o644;

/// Totals for a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub packages: usize,
    pub files: usize,
    pub bytes: u64,
}

/// Mirrors the sources of one snap revision into `root`:
///
/// ```text
/// <root>/snapcraft_<name>_<revision>.yaml
/// <root>/<binary_name>/<binary_version>/<file name from url>
/// ```
///
/// Everything runs sequentially and the first error aborts the run. Nothing
/// is resumed: a second run downloads every file again.
#[derive(Debug)]
pub struct FetchPipeline {
    client: CatalogClient,
    downloader: FileDownloader,
    root: PathBuf,
}

impl FetchPipeline {
    pub fn new(client: CatalogClient, downloader: FileDownloader, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            downloader,
            root: root.into(),
        }
    }

    pub async fn run(&self, snap: &str, revision: u32) -> Result<FetchReport, SourceDownloadError> {
        tracing::info!(snap, revision, "Fetching snap details from {}", self.client.base_url());
        let entry = self.client.get_revision(snap, revision).await?;
        tracing::info!(
            snap = %entry.name,
            revision = %entry.revision,
            arch = %entry.arch,
            packages = entry.packages.len(),
            files = entry.source_file_count(),
            "Resolved snap revision"
        );

        create_dir_all(&self.root).await?;
        self.write_manifest(&entry).await?;

        let mut report = FetchReport::default();
        for package in &entry.packages {
            let (files, bytes) = self.fetch_package(package).await?;
            report.packages += 1;
            report.files += files;
            report.bytes += bytes;
        }

        tracing::info!(
            packages = report.packages,
            files = report.files,
            bytes = report.bytes,
            output = %self.root.display(),
            "All sources downloaded"
        );
        Ok(report)
    }

    async fn write_manifest(&self, entry: &CatalogEntry) -> Result<(), SourceDownloadError> {
        let Some(encoded) = entry.manifest() else {
            tracing::warn!(
                "snapcraft.yaml not available for {} ({})",
                entry.name,
                entry.revision
            );
            return Ok(());
        };

        let manifest = STANDARD
            .decode(encoded)
            .map_err(|e| SourceDownloadError::Decode {
                what: format!("snapcraft.yaml for {} ({})", entry.name, entry.revision),
                reason: e.to_string(),
            })?;

        let path = self.root.join(entry.manifest_file_name());
        write_atomic(&path, &manifest, Some(MANIFEST_MODE)).await?;
        tracing::info!(output = %path.display(), "Saved snapcraft.yaml");
        Ok(())
    }

    async fn fetch_package(&self, package: &PackageRecord) -> Result<(usize, u64), SourceDownloadError> {
        let dir = self.package_dir(package)?;
        let targets = package
            .source_file_urls
            .iter()
            .map(|url| DownloadTarget::new(&dir, url))
            .collect::<Result<Vec<_>, _>>()?;

        create_dir_all(&dir).await?;
        tracing::info!("{} ({})", package.binary_name, package.binary_version);

        let mut bytes = 0;
        for target in &targets {
            bytes += self
                .downloader
                .fetch(&target.local_path, &target.remote_url)
                .await?;
        }
        Ok((targets.len(), bytes))
    }

    fn package_dir(&self, package: &PackageRecord) -> Result<PathBuf, SourceDownloadError> {
        Ok(self
            .root
            .join(path_component(&package.binary_name)?)
            .join(path_component(&package.binary_version)?))
    }
}

// Catalog values become directory names, so they must stay a single component.
fn path_component(value: &str) -> Result<&str, SourceDownloadError> {
    let unsafe_component = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if unsafe_component {
        return Err(SourceDownloadError::UnsafePath {
            component: value.to_string(),
        });
    }
    Ok(value)
}

async fn create_dir_all(path: &Path) -> Result<(), SourceDownloadError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| SourceDownloadError::io(path, e))
}
