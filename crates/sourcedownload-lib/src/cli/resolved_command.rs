use crate::cli::args::Command;
use crate::cli::params::{FetchParams, ListParams};
use crate::config::load_config;
use crate::error::SourceDownloadError;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Fetch(FetchParams),
    List(ListParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, SourceDownloadError> {
    match command {
        Command::Fetch {
            config_path,
            catalog_url,
            snap,
            revision,
            download_path,
        } => {
            if snap.trim().is_empty() || revision == 0 {
                return Err(SourceDownloadError::CliArgumentValidation {
                    details: "The `--snap` and `--revision` arguments are mandatory".to_string(),
                });
            }

            let app_config = load_config(config_path.as_deref())?;
            let catalog_url = parse_catalog_url(catalog_url.unwrap_or(app_config.catalog.url))?;
            let download_path = download_path
                .map(PathBuf::from)
                .unwrap_or(app_config.download.path);

            Ok(ResolvedCommand::Fetch(FetchParams {
                catalog_url,
                snap,
                revision,
                download_path,
            }))
        }
        Command::List {
            config_path,
            catalog_url,
        } => {
            let app_config = load_config(config_path.as_deref())?;
            let catalog_url = parse_catalog_url(catalog_url.unwrap_or(app_config.catalog.url))?;

            Ok(ResolvedCommand::List(ListParams { catalog_url }))
        }
    }
}

fn parse_catalog_url(url: String) -> Result<Url, SourceDownloadError> {
    let parsed = Url::parse(&url).map_err(|e| SourceDownloadError::InvalidUrl {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SourceDownloadError::InvalidUrl {
            url,
            reason: "the compliance service must be reached over http or https".to_string(),
        });
    }
    Ok(parsed)
}
