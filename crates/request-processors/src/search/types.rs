use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoHit {
    pub id: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub published_at: String,
    pub title: String,
    pub view_count: String,
    /// Whole seconds, or -1 when unknown.
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
    pub channel_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioMetaHit {
    pub title: String,
    pub album: String,
    #[serde(rename = "artwork")]
    pub artwork_url: String,
    /// Comma-joined artist names.
    pub artist: String,
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub videos: Vec<VideoHit>,
    pub songs: Vec<AudioMetaHit>,
}
