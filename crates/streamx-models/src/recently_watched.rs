use crate::media::MediaRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyWatchedEntry {
    #[serde(flatten)]
    pub media: MediaRecord,
    pub watched_at: DateTime<Utc>,
}

impl RecentlyWatchedEntry {
    pub fn new(media: MediaRecord, watched_at: DateTime<Utc>) -> Self {
        Self { media, watched_at }
    }
}
