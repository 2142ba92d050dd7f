mod types;
pub use types::*;


use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

const YOUTUBE_API_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3";
const AUDIO_QUERY_QUALIFIER: &str = "audio";
const MAX_SEARCH_RESULTS: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum YouTubeClientError {
    #[error("YouTube Data API key is not configured")]
    MissingApiKey,
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error("Request to the YouTube Data API \"{endpoint}\" endpoint returned with status code \"{status}\"")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("Video metadata could not be found: {0}")]
    VideoNotFound(String),
}

pub struct YouTubeClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn create(api_key: Option<String>) -> Self {
        Self::with_endpoint(YOUTUBE_API_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: &str, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP Client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Searches for videos and returns their ids in the order the API ranked them.
    pub async fn search_videos(&self, query_str: &str) -> Result<Vec<String>, YouTubeClientError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Query<'a> {
            key: &'a str,
            part: &'a str,
            q: String,
            #[serde(rename = "type")]
            kind: &'a str,
            max_results: u32,
        }

        let query = Query {
            key: self.api_key()?,
            part: "snippet",
            q: format!("{} {}", query_str, AUDIO_QUERY_QUALIFIER),
            kind: "video",
            max_results: MAX_SEARCH_RESULTS,
        };

        let response = self
            .client
            .get(format!("{}/search", self.endpoint))
            .query(&query)
            .send()
            .await?;

        let results = check_status(response, "GET /search")?
            .json::<SearchListResponse>()
            .await?;

        let ids: Vec<_> = results
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        debug!(query = query_str, results = ids.len(), "Video search finished");

        Ok(ids)
    }

    pub async fn get_video_details(&self, video_id: &str) -> Result<Video, YouTubeClientError> {
        #[derive(Serialize)]
        struct Query<'a> {
            key: &'a str,
            part: &'a str,
            id: &'a str,
        }

        let query = Query {
            key: self.api_key()?,
            part: "snippet,contentDetails,statistics",
            id: video_id,
        };

        let response = self
            .client
            .get(format!("{}/videos", self.endpoint))
            .query(&query)
            .send()
            .await?;

        let results = check_status(response, "GET /videos")?
            .json::<VideoListResponse>()
            .await?;

        results
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YouTubeClientError::VideoNotFound(video_id.to_string()))
    }

    fn api_key(&self) -> Result<&str, YouTubeClientError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(YouTubeClientError::MissingApiKey)
    }
}

fn check_status(
    response: Response,
    endpoint: &'static str,
) -> Result<Response, YouTubeClientError> {
    match response.status() {
        StatusCode::OK => Ok(response),
        status => Err(YouTubeClientError::UnexpectedStatus { endpoint, status }),
    }
}
