use search_providers::{SpotifyClient, TokenCache, YouTubeClient};
use std::sync::Arc;

pub(crate) struct YouTubeCatalog {
    pub(crate) client: YouTubeClient,
}

pub(crate) struct SpotifyTokenProvider {
    pub(crate) cache: TokenCache,
}

pub(crate) struct SpotifyCatalog {
    pub(crate) client: Arc<SpotifyClient>,
}
