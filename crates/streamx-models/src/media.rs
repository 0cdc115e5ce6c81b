use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical movie metadata as returned by the catalog API.
///
/// Field names follow the catalog's wire format so a record can be stored
/// exactly as it was fetched. Everything except `id` and `title` is optional
/// on the wire and defaults when missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    /// `YYYY-MM-DD`, or empty when the catalog has no date
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
}

/// Web clients write `null` for missing values; read it as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MediaRecord {
    /// Minimal record, mostly useful for tests and placeholders
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            backdrop_path: None,
            poster_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            genre_ids: Vec::new(),
            original_language: String::new(),
            popularity: 0.0,
            video: false,
            adult: false,
        }
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").ok()
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_date().map(|d| d.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_result() {
        let json = r#"{
            "adult": false,
            "backdrop_path": "/bg.jpg",
            "genre_ids": [28, 878],
            "id": 27205,
            "original_language": "en",
            "overview": "A thief who steals corporate secrets...",
            "popularity": 83.952,
            "poster_path": null,
            "release_date": "2010-07-15",
            "title": "Inception",
            "video": false,
            "vote_average": 8.4,
            "vote_count": 35000
        }"#;

        let record: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 27205);
        assert_eq!(record.title, "Inception");
        assert_eq!(record.backdrop_path.as_deref(), Some("/bg.jpg"));
        assert_eq!(record.poster_path, None);
        assert_eq!(record.genre_ids, vec![28, 878]);
        assert_eq!(record.release_year(), Some(2010));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let record: MediaRecord = serde_json::from_str(r#"{"id": 1, "title": "Bare"}"#).unwrap();
        assert_eq!(record, MediaRecord::new(1, "Bare"));
        assert_eq!(record.release_date(), None);
    }

    #[test]
    fn test_null_values_read_as_defaults() {
        let record: MediaRecord = serde_json::from_str(
            r#"{"id": 3, "title": "Sparse", "overview": null, "release_date": null,
                "vote_average": null, "genre_ids": null, "adult": null}"#,
        )
        .unwrap();
        assert_eq!(record, MediaRecord::new(3, "Sparse"));
    }

    #[test]
    fn test_integer_rating_is_accepted() {
        let record: MediaRecord =
            serde_json::from_str(r#"{"id": 2, "title": "Round", "vote_average": 7}"#).unwrap();
        assert_eq!(record.vote_average, 7.0);
    }
}
