use crate::error::SourceDownloadError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

pub const TEMP_SUFFIX: &str = ".tmp";

/// A file written under `<final>.tmp` and renamed onto `<final>` once complete.
///
/// Nothing is ever visible at the final path until [`StagedFile::commit`]
/// succeeds. Dropping a `StagedFile` without committing leaves the `.tmp`
/// file on disk; the next attempt for the same path truncates it.
pub struct StagedFile {
    final_path: PathBuf,
    temp_path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl StagedFile {
    pub fn temp_path_for(final_path: &Path) -> PathBuf {
        let mut name = OsString::from(final_path.as_os_str());
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }

    pub async fn create(final_path: impl Into<PathBuf>) -> Result<Self, SourceDownloadError> {
        Self::create_with_mode(final_path, None).await
    }

    /// `mode` sets unix permission bits on the temp file, and so on the final
    /// file, and is ignored elsewhere.
    pub async fn create_with_mode(
        final_path: impl Into<PathBuf>,
        mode: Option<u32>,
    ) -> Result<Self, SourceDownloadError> {
        let final_path = final_path.into();
        let temp_path = Self::temp_path_for(&final_path);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .await
            .map_err(|e| SourceDownloadError::io(&temp_path, e))?;

        // Truncating a leftover temp file keeps its old mode.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if let Some(mode) = mode {
                file.set_permissions(std::fs::Permissions::from_mode(mode))
                    .await
                    .map_err(|e| SourceDownloadError::io(&temp_path, e))?;
            }
        }
        #[cfg(not(unix))]
        let _ = mode;

        tracing::trace!(output = %temp_path.display(), "Opened staging file");

        Ok(Self {
            final_path,
            temp_path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub async fn write_all(&mut self, data: &[u8]) -> Result<(), SourceDownloadError> {
        self.writer
            .write_all(data)
            .await
            .map_err(|e| SourceDownloadError::io(&self.temp_path, e))?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush, close and rename onto the final path. Returns the number of bytes written.
    pub async fn commit(self) -> Result<u64, SourceDownloadError> {
        let Self {
            final_path,
            temp_path,
            mut writer,
            written,
        } = self;

        writer
            .flush()
            .await
            .map_err(|e| SourceDownloadError::io(&temp_path, e))?;
        let mut file = writer.into_inner();
        file.flush()
            .await
            .map_err(|e| SourceDownloadError::io(&temp_path, e))?;
        // Close before renaming.
        drop(file);

        tokio::fs::rename(&temp_path, &final_path)
            .await
            .map_err(|e| SourceDownloadError::io(&final_path, e))?;
        tracing::trace!(output = %final_path.display(), bytes = written, "Committed staging file");
        Ok(written)
    }
}

/// Write `contents` to `path` through a [`StagedFile`].
pub async fn write_atomic(
    path: &Path,
    contents: &[u8],
    mode: Option<u32>,
) -> Result<u64, SourceDownloadError> {
    let mut staged = StagedFile::create_with_mode(path, mode).await?;
    staged.write_all(contents).await?;
    staged.commit().await
}
