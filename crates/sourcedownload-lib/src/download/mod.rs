mod download;
mod progress;
mod staged;
mod types;

pub use download::FileDownloader;
pub use progress::{ProgressCounter, ProgressSink, SilentProgress, TerminalProgress, format_bytes};
pub use staged::{StagedFile, TEMP_SUFFIX, write_atomic};
pub use types::{DownloadTarget, file_name_from_url};
