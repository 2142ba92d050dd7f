use crate::search::traits::*;
use crate::search::types::{AudioMetaHit, VideoHit};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct MockError(pub(crate) String);

pub(crate) fn video_hit(video_id: &str) -> VideoHit {
    VideoHit {
        id: video_id.to_string(),
        title: format!("Video {}", video_id),
        duration_seconds: 240,
        ..VideoHit::default()
    }
}

pub(crate) fn audio_hit(title: &str) -> AudioMetaHit {
    AudioMetaHit {
        title: title.to_string(),
        artist: "Artist".into(),
        duration_seconds: 180,
        ..AudioMetaHit::default()
    }
}

#[derive(Default)]
pub(crate) struct MockVideoCatalog {
    pub(crate) search_result: Option<Vec<String>>,
    pub(crate) failing_ids: HashSet<String>,
    pub(crate) detail_delay: Option<Duration>,
    pub(crate) detail_calls: AtomicUsize,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

impl MockVideoCatalog {
    pub(crate) fn with_ids(ids: &[&str]) -> Self {
        Self {
            search_result: Some(ids.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl VideoCatalog for MockVideoCatalog {
    async fn search_videos(&self, _query: &str) -> Result<Vec<String>, VideoCatalogError> {
        self.search_result
            .clone()
            .ok_or_else(|| VideoCatalogError(Box::new(MockError("search is down".into()))))
    }

    async fn get_video_detail(&self, video_id: &str) -> Result<VideoHit, VideoCatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if let Some(delay) = self.detail_delay {
            actix_rt::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_ids.contains(video_id) {
            return Err(VideoCatalogError(Box::new(MockError(format!(
                "detail not found: {}",
                video_id
            )))));
        }

        Ok(video_hit(video_id))
    }
}

pub(crate) struct MockTokenProvider {
    pub(crate) token: Option<String>,
    pub(crate) calls: AtomicUsize,
}

impl MockTokenProvider {
    pub(crate) fn new(token: Option<&str>) -> Self {
        Self {
            token: token.map(ToString::to_string),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self) -> Result<String, TokenProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.clone().ok_or_else(|| {
            TokenProviderError(Box::new(MockError(
                "SPOTIFY_API_CLIENT_ID environment variable not set".into(),
            )))
        })
    }
}

#[derive(Default)]
pub(crate) struct MockTrackCatalog {
    pub(crate) tracks: Option<Vec<AudioMetaHit>>,
    pub(crate) seen_tokens: Mutex<Vec<String>>,
}

#[async_trait]
impl TrackCatalog for MockTrackCatalog {
    async fn search_tracks(
        &self,
        token: &str,
        _query: &str,
    ) -> Result<Vec<AudioMetaHit>, TrackCatalogError> {
        self.seen_tokens.lock().unwrap().push(token.to_string());
        self.tracks
            .clone()
            .ok_or_else(|| TrackCatalogError(Box::new(MockError("track search is down".into()))))
    }
}
