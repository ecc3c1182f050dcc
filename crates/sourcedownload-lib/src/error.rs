use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceDownloadError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Network, DNS or TLS failure, or a non-success status from an artifact host.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response from the catalog; displays the service's own message.
    #[error("{message}")]
    Catalog { status: u16, message: String },

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Refusing to use unsafe path component {component:?} from the catalog")]
    UnsafePath { component: String },

    #[error("Invalid arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

impl SourceDownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
