use crate::search::fan_out::{DetailFanOut, FanOutError};
use crate::search::traits::{
    TokenProvider, TokenProviderError, TrackCatalog, TrackCatalogError, VideoCatalog,
    VideoCatalogError,
};
use crate::search::types::{AudioMetaHit, SearchResult, VideoHit};
use std::fmt::Formatter;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum SearchBranchError {
    #[error("Video search failed: {0}")]
    VideoSearch(#[source] VideoCatalogError),
    #[error("Video details failed: {0}")]
    VideoDetails(#[source] FanOutError),
    #[error("Token acquisition failed: {0}")]
    Token(#[source] TokenProviderError),
    #[error("Track search failed: {0}")]
    TrackSearch(#[source] TrackCatalogError),
}

/// One or both search branches degraded. The accompanying result is still usable.
#[derive(Debug, thiserror::Error)]
pub struct SearchError(pub Vec<SearchBranchError>);

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        write!(f, "{}", messages.join("; "))
    }
}

pub struct SearchAggregator {
    video_catalog: Arc<dyn VideoCatalog>,
    detail_fan_out: DetailFanOut,
    token_provider: Arc<dyn TokenProvider>,
    track_catalog: Arc<dyn TrackCatalog>,
}

impl SearchAggregator {
    pub fn new(
        video_catalog: Arc<dyn VideoCatalog>,
        token_provider: Arc<dyn TokenProvider>,
        track_catalog: Arc<dyn TrackCatalog>,
        max_detail_concurrency: usize,
    ) -> Self {
        let detail_fan_out = DetailFanOut::new(video_catalog.clone(), max_detail_concurrency);

        Self {
            video_catalog,
            detail_fan_out,
            token_provider,
            track_catalog,
        }
    }

    /// Runs the video and track branches concurrently and merges whatever they produced.
    pub async fn search(&self, query: &str) -> (SearchResult, Option<SearchError>) {
        debug!(query, "Searching");

        let ((videos, video_errors), songs) =
            futures::join!(self.search_videos(query), self.search_songs(query));

        let mut errors = video_errors;
        let songs = songs.unwrap_or_else(|error| {
            errors.push(error);
            vec![]
        });

        let result = SearchResult { videos, songs };

        if errors.is_empty() {
            return (result, None);
        }

        let error = SearchError(errors);
        warn!(query, %error, "Search degraded");

        (result, Some(error))
    }

    async fn search_videos(&self, query: &str) -> (Vec<VideoHit>, Vec<SearchBranchError>) {
        let video_ids = match self.video_catalog.search_videos(query).await {
            Ok(video_ids) => video_ids,
            Err(error) => return (vec![], vec![SearchBranchError::VideoSearch(error)]),
        };

        match self.detail_fan_out.fetch_all(&video_ids).await {
            (videos, None) => (videos, vec![]),
            (videos, Some(error)) => (videos, vec![SearchBranchError::VideoDetails(error)]),
        }
    }

    async fn search_songs(&self, query: &str) -> Result<Vec<AudioMetaHit>, SearchBranchError> {
        let token = self
            .token_provider
            .get_token()
            .await
            .map_err(SearchBranchError::Token)?;

        self.track_catalog
            .search_tracks(&token, query)
            .await
            .map_err(SearchBranchError::TrackSearch)
    }
}
