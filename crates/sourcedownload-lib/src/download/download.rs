use super::progress::{ProgressCounter, ProgressSink};
use super::staged::StagedFile;
use crate::error::SourceDownloadError;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

/// Streams single URLs to disk through a [`StagedFile`].
#[derive(Clone)]
pub struct FileDownloader {
    http: Client,
    progress: Arc<dyn ProgressSink>,
}

impl FileDownloader {
    pub fn new(http: Client, progress: Arc<dyn ProgressSink>) -> Self {
        Self { http, progress }
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// The body is written to `<destination>.tmp` chunk by chunk and renamed
    /// into place only after the whole body has been copied. On any failure the
    /// `.tmp` file is left behind and `destination` is untouched.
    pub async fn fetch(&self, destination: &Path, url: &str) -> Result<u64, SourceDownloadError> {
        let mut staged = StagedFile::create(destination).await?;

        tracing::debug!(url, output = %destination.display(), "Downloading");
        let response = self.http.get(url).send().await?.error_for_status()?;

        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
        let mut counter = ProgressCounter::new(&file_name, self.progress.as_ref());

        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| {
                SourceDownloadError::io(staged.temp_path(), std::io::Error::other(e))
            })?;
            staged.write_all(&chunk).await?;
            counter.add(chunk.len());
        }
        counter.finish();

        let written = staged.commit().await?;
        tracing::debug!(url, output = %destination.display(), bytes = written, "Downloaded");
        Ok(written)
    }
}

impl std::fmt::Debug for FileDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownloader").finish_non_exhaustive()
    }
}
