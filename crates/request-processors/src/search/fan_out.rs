use crate::search::traits::{VideoCatalog, VideoCatalogError};
use crate::search::types::VideoHit;
use futures::{stream, StreamExt};
use std::fmt::Formatter;
use std::sync::Arc;
use tracing::{debug, warn};

/// Every detail fetch that failed during one fan-out.
#[derive(Debug, thiserror::Error)]
pub struct FanOutError(pub Vec<VideoCatalogError>);

impl std::fmt::Display for FanOutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        write!(f, "{}", messages.join("; "))
    }
}

pub struct DetailFanOut {
    catalog: Arc<dyn VideoCatalog>,
    max_concurrency: usize,
}

impl DetailFanOut {
    pub fn new(catalog: Arc<dyn VideoCatalog>, max_concurrency: usize) -> Self {
        Self {
            catalog,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Fetches details for every id and waits for all of them. Successful details are
    /// returned in completion order even when some fetches failed.
    pub async fn fetch_all(&self, video_ids: &[String]) -> (Vec<VideoHit>, Option<FanOutError>) {
        debug!(
            count = video_ids.len(),
            max_concurrency = self.max_concurrency,
            "Fetching video details"
        );

        let results = stream::iter(video_ids)
            .map(|video_id| self.catalog.get_video_detail(video_id))
            .buffer_unordered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut details = Vec::with_capacity(results.len());
        let mut errors = vec![];

        for result in results {
            match result {
                Ok(detail) => details.push(detail),
                Err(error) => {
                    warn!(%error, "Unable to fetch video details");
                    errors.push(error);
                }
            }
        }

        let error = if errors.is_empty() {
            None
        } else {
            Some(FanOutError(errors))
        };

        (details, error)
    }
}
