use crate::{AuthToken, SpotifyClient, SpotifyClientError};
use async_lock::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Process-wide holder of the metadata provider access token.
///
/// The lock is held for the whole check/refresh/read sequence, so concurrent
/// callers racing on an expired token trigger a single exchange.
pub struct TokenCache {
    client: Arc<SpotifyClient>,
    cached: Mutex<Option<AuthToken>>,
}

impl TokenCache {
    pub fn new(client: Arc<SpotifyClient>) -> Self {
        Self {
            client,
            cached: Mutex::new(None),
        }
    }

    pub async fn get_token(&self) -> Result<String, SpotifyClientError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|token| token.is_valid()) {
            return Ok(token.value.clone());
        }

        debug!("Access token is missing or expired, refreshing");

        // The previous token stays in place when the refresh fails.
        let token = self.client.fetch_auth_token().await.map_err(|error| {
            warn!(?error, "Unable to refresh access token");
            error
        })?;
        let value = token.value.clone();
        cached.replace(token);

        Ok(value)
    }
}
