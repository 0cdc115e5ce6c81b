use crate::error::CatalogError;
use crate::tmdb::{CatalogPage, MovieDetails};
use crate::video::VideoList;
use async_trait::async_trait;
use streamx_models::MediaRecord;

/// Read-only movie catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn trending(&self) -> Result<CatalogPage, CatalogError>;
    /// Popular titles in a named category; unknown names fall back to action
    async fn by_category(&self, category: &str) -> Result<CatalogPage, CatalogError>;
    async fn details(&self, id: u64) -> Result<MovieDetails, CatalogError>;
    async fn search(&self, query: &str) -> Result<CatalogPage, CatalogError>;
    async fn videos(&self, id: u64) -> Result<VideoList, CatalogError>;

    /// Canonical record for one title, as stored in the local collections
    async fn record(&self, id: u64) -> Result<MediaRecord, CatalogError> {
        Ok(self.details(id).await?.to_record())
    }
}
