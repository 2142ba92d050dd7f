mod token;
mod types;

pub use token::*;
pub use types::*;


use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

const SPOTIFY_ACCOUNTS_ENDPOINT: &str = "https://accounts.spotify.com/api";
const SPOTIFY_API_ENDPOINT: &str = "https://api.spotify.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum SpotifyClientError {
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error("Request to the Spotify API \"{endpoint}\" endpoint returned with status code \"{status}\"")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("Invalid token duration")]
    InvalidTokenLifetime,
}

#[derive(Clone, Debug, Default)]
pub struct SpotifyCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

pub struct SpotifyClient {
    client: Client,
    accounts_endpoint: String,
    api_endpoint: String,
    credentials: SpotifyCredentials,
}

impl SpotifyClient {
    pub fn create(credentials: SpotifyCredentials) -> Self {
        Self::with_endpoints(SPOTIFY_ACCOUNTS_ENDPOINT, SPOTIFY_API_ENDPOINT, credentials)
    }

    pub fn with_endpoints(
        accounts_endpoint: &str,
        api_endpoint: &str,
        credentials: SpotifyCredentials,
    ) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP Client");

        Self {
            client,
            accounts_endpoint: accounts_endpoint.trim_end_matches('/').to_string(),
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Performs the client-credentials exchange. The expiry is computed from the
    /// lifetime the server declared.
    pub async fn fetch_auth_token(&self) -> Result<AuthToken, SpotifyClientError> {
        let client_id = required(&self.credentials.client_id, "SPOTIFY_API_CLIENT_ID")?;
        let client_secret = required(&self.credentials.client_secret, "SPOTIFY_API_CLIENT_SECRET")?;

        #[derive(Serialize)]
        struct TokenForm<'a> {
            grant_type: &'a str,
            client_id: &'a str,
            client_secret: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            #[serde(default)]
            token_type: String,
            #[serde(default)]
            expires_in: Option<u64>,
        }

        let form = TokenForm {
            grant_type: "client_credentials",
            client_id,
            client_secret,
        };

        let response = self
            .client
            .post(format!("{}/token", self.accounts_endpoint))
            .form(&form)
            .send()
            .await?;

        let token = check_status(response, "POST /token")?
            .json::<TokenResponse>()
            .await?;

        let lifetime = match token.expires_in {
            Some(seconds) if seconds > 0 => Duration::from_secs(seconds),
            _ => return Err(SpotifyClientError::InvalidTokenLifetime),
        };

        debug!(lifetime = lifetime.as_secs(), "Received new access token");

        Ok(AuthToken {
            value: token.access_token,
            kind: token.token_type,
            expires_at: Instant::now() + lifetime,
        })
    }

    pub async fn search_tracks(
        &self,
        token: &str,
        query_str: &str,
    ) -> Result<Vec<Track>, SpotifyClientError> {
        #[derive(Serialize)]
        struct Query<'a> {
            q: &'a str,
            #[serde(rename = "type")]
            kind: &'a str,
        }

        let response = self
            .client
            .get(format!("{}/search", self.api_endpoint))
            .bearer_auth(token)
            .query(&Query {
                q: query_str,
                kind: "track",
            })
            .send()
            .await?;

        let results = check_status(response, "GET /search")?
            .json::<SearchResponse>()
            .await?;

        Ok(results.tracks.items)
    }
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, SpotifyClientError> {
    value
        .as_deref()
        .ok_or(SpotifyClientError::MissingCredential(name))
}

fn check_status(
    response: Response,
    endpoint: &'static str,
) -> Result<Response, SpotifyClientError> {
    match response.status() {
        StatusCode::OK => Ok(response),
        status => Err(SpotifyClientError::UnexpectedStatus { endpoint, status }),
    }
}
