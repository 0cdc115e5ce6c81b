use crate::error::CatalogError;
use crate::genre::Genre;
use crate::video::VideoList;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use streamx_models::MediaRecord;

/// One page of list results (trending, discover, search).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MediaRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

impl CatalogPage {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreInfo {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

/// Movie detail response with videos and credits appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub media: MediaRecord,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreInfo>,
    #[serde(default)]
    pub videos: VideoList,
    #[serde(default)]
    pub credits: Credits,
}

impl MovieDetails {
    /// The detail endpoint reports `genres` objects instead of `genre_ids`
    pub fn to_record(&self) -> MediaRecord {
        let mut record = self.media.clone();
        if record.genre_ids.is_empty() {
            record.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        record
    }

    /// Category used for the "more like this" row: the first genre we know
    pub fn similar_category(&self) -> Genre {
        self.genres
            .iter()
            .find_map(|g| Genre::from_id(g.id).or_else(|| Genre::lookup(&g.name)))
            .unwrap_or(Genre::Action)
    }

    /// Top-billed cast, in billing order
    pub fn top_cast(&self, limit: usize) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.credits.cast.iter().collect();
        cast.sort_by_key(|c| c.order);
        cast.truncate(limit);
        cast
    }
}

pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
