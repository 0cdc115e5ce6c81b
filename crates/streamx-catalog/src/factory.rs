use crate::error::CatalogError;
use crate::tmdb::TmdbClient;
use streamx_config::{CatalogConfig, CredentialStore};
use tracing::debug;

/// Build the catalog client from configuration.
///
/// The API key comes from `STREAMX_API_KEY` when set, otherwise from the
/// credential store.
pub fn create_catalog(
    config: &CatalogConfig,
    credentials: &CredentialStore,
) -> Result<TmdbClient, CatalogError> {
    let api_key = credentials
        .resolve_catalog_api_key()
        .ok_or(CatalogError::MissingApiKey)?;
    debug!("Creating catalog client for {}", config.base_url);
    Ok(TmdbClient::from_config(config, api_key))
}
