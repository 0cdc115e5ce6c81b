use crate::media::MediaRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DownloadQuality {
    #[serde(rename = "480p")]
    Sd480,
    #[serde(rename = "720p")]
    Hd720,
    #[default]
    #[serde(rename = "1080p")]
    FullHd1080,
    #[serde(rename = "4K")]
    Uhd4k,
}

impl DownloadQuality {
    pub fn label(&self) -> &'static str {
        match self {
            DownloadQuality::Sd480 => "480p",
            DownloadQuality::Hd720 => "720p",
            DownloadQuality::FullHd1080 => "1080p",
            DownloadQuality::Uhd4k => "4K",
        }
    }

    /// Approximate size of a feature-length title at this quality
    pub fn typical_size(&self) -> &'static str {
        match self {
            DownloadQuality::Sd480 => "0.7 GB",
            DownloadQuality::Hd720 => "1.2 GB",
            DownloadQuality::FullHd1080 => "2.1 GB",
            DownloadQuality::Uhd4k => "7.8 GB",
        }
    }
}

impl fmt::Display for DownloadQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DownloadQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "480p" | "480" | "sd" => Ok(DownloadQuality::Sd480),
            "720p" | "720" | "hd" => Ok(DownloadQuality::Hd720),
            "1080p" | "1080" | "fhd" => Ok(DownloadQuality::FullHd1080),
            "4k" | "2160p" | "uhd" => Ok(DownloadQuality::Uhd4k),
            _ => Err(format!("Invalid quality: {}. Use '480p', '720p', '1080p' or '4K'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEntry {
    #[serde(flatten)]
    pub media: MediaRecord,
    pub downloaded_at: DateTime<Utc>,
    pub quality: DownloadQuality,
    /// Human readable size, e.g. "2.1 GB"
    pub size: String,
}

impl DownloadEntry {
    pub fn new(media: MediaRecord, downloaded_at: DateTime<Utc>, quality: DownloadQuality) -> Self {
        Self {
            media,
            downloaded_at,
            quality,
            size: quality.typical_size().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_wire_labels() {
        assert_eq!(serde_json::to_string(&DownloadQuality::FullHd1080).unwrap(), "\"1080p\"");
        assert_eq!(serde_json::to_string(&DownloadQuality::Uhd4k).unwrap(), "\"4K\"");
        let parsed: DownloadQuality = serde_json::from_str("\"720p\"").unwrap();
        assert_eq!(parsed, DownloadQuality::Hd720);
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("4k".parse::<DownloadQuality>().unwrap(), DownloadQuality::Uhd4k);
        assert_eq!("1080P".parse::<DownloadQuality>().unwrap(), DownloadQuality::FullHd1080);
        assert!("8k".parse::<DownloadQuality>().is_err());
    }

    #[test]
    fn test_reads_entry_written_by_web_client() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "poster_path": "/p.jpg",
            "downloadedAt": "2024-05-02T18:30:00.000Z",
            "quality": "1080p",
            "size": "2.1 GB"
        }"#;
        let entry: DownloadEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.media.id, 550);
        assert_eq!(entry.quality, DownloadQuality::FullHd1080);
        assert_eq!(entry.size, "2.1 GB");
    }
}
