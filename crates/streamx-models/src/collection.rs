use serde::{Deserialize, Serialize};
use std::fmt;

/// The four locally persisted media lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Watchlist,
    ContinueWatching,
    Downloads,
    RecentlyWatched,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Watchlist,
        Collection::ContinueWatching,
        Collection::Downloads,
        Collection::RecentlyWatched,
    ];

    /// Name of the storage slot holding this collection's snapshot
    pub fn storage_key(&self) -> &'static str {
        match self {
            Collection::Watchlist => "watchlist",
            Collection::ContinueWatching => "continueWatching",
            Collection::Downloads => "downloads",
            Collection::RecentlyWatched => "recentlyWatched",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Collection::Watchlist => "My List",
            Collection::ContinueWatching => "Continue Watching",
            Collection::Downloads => "Downloads",
            Collection::RecentlyWatched => "Recently Watched",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_match_serialized_names() {
        for collection in Collection::ALL {
            let json = serde_json::to_string(&collection).unwrap();
            assert_eq!(json, format!("\"{}\"", collection.storage_key()));
        }
    }
}
