use crate::duration::normalize_millis;
use serde::Deserialize;
use std::time::Instant;

const MIN_ARTWORK_WIDTH: u32 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken {
    pub value: String,
    pub kind: String,
    pub expires_at: Instant,
}

impl AuthToken {
    pub fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) tracks: TrackPage,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub(crate) items: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub album: Album,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub duration_ms: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Album {
    pub name: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Track {
    /// First album image at least 300px wide, otherwise the first image listed.
    pub fn artwork_url(&self) -> &str {
        let images = &self.album.images;

        images
            .iter()
            .find(|image| image.width.unwrap_or_default() >= MIN_ARTWORK_WIDTH)
            .or_else(|| images.first())
            .map(|image| image.url.as_str())
            .unwrap_or_default()
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn duration_seconds(&self) -> i64 {
        normalize_millis(self.duration_ms)
    }
}
