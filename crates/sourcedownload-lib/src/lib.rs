pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod pipeline;

pub use catalog::CatalogClient;
pub use config::Config;
pub use download::FileDownloader;
pub use error::SourceDownloadError;
pub use pipeline::{FetchPipeline, FetchReport};
