use crate::catalog::CatalogClient;
use crate::cli::http::build_http_client;
use crate::cli::params::FetchParams;
use crate::download::{FileDownloader, TerminalProgress};
use crate::error::SourceDownloadError;
use crate::pipeline::{FetchPipeline, FetchReport};
use std::sync::Arc;

pub async fn run_fetch(params: FetchParams) -> Result<FetchReport, SourceDownloadError> {
    let FetchParams {
        catalog_url,
        snap,
        revision,
        download_path,
    } = params;

    let http = build_http_client()?;
    let client = CatalogClient::new(http.clone(), catalog_url)?;
    let downloader = FileDownloader::new(http, Arc::new(TerminalProgress::new()));
    let pipeline = FetchPipeline::new(client, downloader, download_path);

    pipeline.run(&snap, revision).await
}
