use crate::catalog::{CatalogClient, render_listing, sort_summaries};
use crate::cli::http::build_http_client;
use crate::cli::params::ListParams;
use crate::error::SourceDownloadError;

pub async fn run_list(params: ListParams) -> Result<(), SourceDownloadError> {
    let client = CatalogClient::new(build_http_client()?, params.catalog_url)?;

    tracing::debug!("Listing snaps from {}", client.base_url());
    let summaries = sort_summaries(client.list_snaps().await?);
    tracing::debug!("Catalog holds {} snap revisions", summaries.len());

    print!("{}", render_listing(&summaries));
    Ok(())
}
