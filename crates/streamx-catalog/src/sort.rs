use std::cmp::Ordering;
use std::str::FromStr;
use streamx_models::MediaRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Most popular first
    #[default]
    Popularity,
    /// Highest rated first
    Rating,
    /// Newest release first, undated titles last
    Year,
    /// Alphabetical, case-insensitive
    Title,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "popularity" | "popular" => Ok(SortBy::Popularity),
            "rating" => Ok(SortBy::Rating),
            "year" | "date" => Ok(SortBy::Year),
            "title" | "name" => Ok(SortBy::Title),
            _ => Err(format!("Invalid sort: {}. Use 'popularity', 'rating', 'year' or 'title'", s)),
        }
    }
}

/// Stable in-place sort of catalog results.
pub fn sort_records(records: &mut [MediaRecord], by: SortBy) {
    match by {
        SortBy::Popularity => records.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
        SortBy::Rating => records.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average)),
        SortBy::Year => records.sort_by(|a, b| match (a.release_date(), b.release_date()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortBy::Title => records.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        }),
    }
}

/// Drop one title from a result list (e.g. the movie whose similar titles are shown)
pub fn exclude_id(records: Vec<MediaRecord>, id: u64) -> Vec<MediaRecord> {
    records.into_iter().filter(|r| r.id != id).collect()
}
