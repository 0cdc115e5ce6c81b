use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    /// Site-specific video key (a YouTube id for YouTube videos)
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
}

impl Video {
    fn is_trailer_or_teaser(&self) -> bool {
        self.kind == "Trailer" || self.kind == "Teaser"
    }
}

/// Which videos count as a trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailerMatch {
    /// Player: trailers and teasers only
    #[default]
    TrailerOrTeaser,
    /// Detail page: also any official video
    TrailerTeaserOrOfficial,
}

/// First matching video in list order.
pub fn select_trailer(videos: &[Video], matching: TrailerMatch) -> Option<&Video> {
    videos.iter().find(|v| match matching {
        TrailerMatch::TrailerOrTeaser => v.is_trailer_or_teaser(),
        TrailerMatch::TrailerTeaserOrOfficial => v.is_trailer_or_teaser() || v.official,
    })
}

pub fn trailer_watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

pub fn trailer_embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{}?autoplay=1", key)
}
