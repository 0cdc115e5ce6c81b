use crate::media::MediaRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWatchingEntry {
    #[serde(flatten)]
    pub media: MediaRecord,
    /// Playback position as a percentage, 0 to 100
    pub progress: f64,
    pub last_watched: DateTime<Utc>,
}

impl ContinueWatchingEntry {
    pub fn new(media: MediaRecord, progress: f64, last_watched: DateTime<Utc>) -> Self {
        Self {
            media,
            progress: clamp_progress(progress),
            last_watched,
        }
    }
}

/// Clamp a playback percentage into `0..=100`. Non-finite input becomes 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
