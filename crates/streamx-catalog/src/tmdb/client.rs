use crate::error::CatalogError;
use crate::genre::Genre;
use crate::tmdb::api::{self, CatalogPage, MovieDetails};
use crate::traits::CatalogSource;
use crate::video::VideoList;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use streamx_config::CatalogConfig;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
    include_adult: bool,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: "en-US".to_string(),
            include_adult: false,
        }
    }

    pub fn from_config(config: &CatalogConfig, api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_base_url(&config.base_url)
            .with_language(&config.language)
            .with_include_adult(config.include_adult)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Common query parameters followed by the endpoint-specific ones
    fn query_params(&self, extra: &[(&str, String)]) -> Vec<(String, String)> {
        let mut params = vec![
            ("api_key".to_string(), self.api_key.clone()),
            ("language".to_string(), self.language.clone()),
        ];
        params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.clone())));
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(extra))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| CatalogError::Http {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| CatalogError::Http {
            endpoint: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        api::decode(path, &body)
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn trending(&self) -> Result<CatalogPage, CatalogError> {
        let page: CatalogPage = self.get_json("/trending/movie/week", &[]).await?;
        info!("Fetched {} trending titles", page.results.len());
        Ok(page)
    }

    async fn by_category(&self, category: &str) -> Result<CatalogPage, CatalogError> {
        let genre = Genre::from_category(category);
        debug!("Category '{}' resolved to genre {} ({})", category, genre, genre.id());
        let page: CatalogPage = self
            .get_json(
                "/discover/movie",
                &[
                    ("with_genres", genre.id().to_string()),
                    ("sort_by", "popularity.desc".to_string()),
                ],
            )
            .await?;
        info!("Fetched {} {} titles", page.results.len(), genre);
        Ok(page)
    }

    async fn details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        self.get_json(
            &format!("/movie/{}", id),
            &[("append_to_response", "videos,credits".to_string())],
        )
        .await
    }

    async fn search(&self, query: &str) -> Result<CatalogPage, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Empty search query, skipping request");
            return Ok(CatalogPage::empty());
        }
        let page: CatalogPage = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("page", "1".to_string()),
                    ("include_adult", self.include_adult.to_string()),
                ],
            )
            .await?;
        info!("Search '{}' returned {} titles", query, page.results.len());
        Ok(page)
    }

    async fn videos(&self, id: u64) -> Result<VideoList, CatalogError> {
        self.get_json(&format!("/movie/{}/videos", id), &[]).await
    }
}
