mod client;
mod listing;
mod types;

pub use client::CatalogClient;
pub use listing::{render_listing, sort_summaries};
pub use types::{
    ApiError, CatalogEntry, CatalogSummary, Copyright, ListResponse, PackageRecord, SnapResponse,
};
