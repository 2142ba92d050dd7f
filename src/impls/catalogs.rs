use crate::services::{SpotifyCatalog, SpotifyTokenProvider, YouTubeCatalog};
use async_trait::async_trait;
use request_processors::{
    AudioMetaHit, TokenProvider, TokenProviderError, TrackCatalog, TrackCatalogError,
    VideoCatalog, VideoCatalogError, VideoHit,
};
use search_providers::{SpotifyClient, TokenCache, Track, Video, YouTubeClient};

fn video_hit(video: Video) -> VideoHit {
    VideoHit {
        thumbnail_url: video.thumbnail_url().to_string(),
        duration_seconds: video.duration_seconds(),
        id: video.id,
        published_at: video.snippet.published_at,
        title: video.snippet.title,
        view_count: video.statistics.view_count,
        channel_title: video.snippet.channel_title,
    }
}

fn audio_meta_hit(track: Track) -> AudioMetaHit {
    AudioMetaHit {
        artwork_url: track.artwork_url().to_string(),
        artist: track.artist_names(),
        duration_seconds: track.duration_seconds(),
        title: track.name,
        album: track.album.name,
    }
}

#[async_trait]
impl VideoCatalog for YouTubeCatalog {
    async fn search_videos(&self, query: &str) -> Result<Vec<String>, VideoCatalogError> {
        YouTubeClient::search_videos(&self.client, query)
            .await
            .map_err(|error| VideoCatalogError(Box::new(error)))
    }

    async fn get_video_detail(&self, video_id: &str) -> Result<VideoHit, VideoCatalogError> {
        YouTubeClient::get_video_details(&self.client, video_id)
            .await
            .map(video_hit)
            .map_err(|error| VideoCatalogError(Box::new(error)))
    }
}

#[async_trait]
impl TokenProvider for SpotifyTokenProvider {
    async fn get_token(&self) -> Result<String, TokenProviderError> {
        TokenCache::get_token(&self.cache)
            .await
            .map_err(|error| TokenProviderError(Box::new(error)))
    }
}

#[async_trait]
impl TrackCatalog for SpotifyCatalog {
    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Vec<AudioMetaHit>, TrackCatalogError> {
        let tracks = SpotifyClient::search_tracks(&self.client, token, query)
            .await
            .map_err(|error| TrackCatalogError(Box::new(error)))?;

        Ok(tracks.into_iter().map(audio_meta_hit).collect())
    }
}
