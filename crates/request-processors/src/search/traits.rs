use crate::search::types::{AudioMetaHit, VideoHit};
use async_trait::async_trait;
use std::fmt::Formatter;

#[derive(Debug, thiserror::Error)]
pub struct VideoCatalogError(pub Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for VideoCatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn search_videos(&self, query: &str) -> Result<Vec<String>, VideoCatalogError>;
    async fn get_video_detail(&self, video_id: &str) -> Result<VideoHit, VideoCatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub struct TokenProviderError(pub Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for TokenProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> Result<String, TokenProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub struct TrackCatalogError(pub Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for TrackCatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait TrackCatalog: Send + Sync {
    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Vec<AudioMetaHit>, TrackCatalogError>;
}
