use crate::media::MediaRecord;
use serde::{Deserialize, Serialize};

/// Membership in "My List". Carries nothing beyond the catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub media: MediaRecord,
}

impl From<MediaRecord> for WatchlistEntry {
    fn from(media: MediaRecord) -> Self {
        Self { media }
    }
}
