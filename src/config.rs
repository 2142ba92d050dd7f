use serde::Deserialize;

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30u64
}

fn default_detail_fetch_concurrency() -> usize {
    8usize
}

fn default_yt_dlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_download_directory() -> String {
    "downloads".to_string()
}

fn default_song_directory() -> String {
    "static/song".to_string()
}

fn default_song_url_prefix() -> String {
    "/song".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ProviderCredentials {
    #[serde(rename = "melo_yt_api_key")]
    pub(crate) youtube_api_key: Option<String>,
    #[serde(rename = "spotify_api_client_id")]
    pub(crate) spotify_client_id: Option<String>,
    #[serde(rename = "spotify_api_client_secret")]
    pub(crate) spotify_client_secret: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct MediaConfig {
    #[serde(default = "default_yt_dlp_path")]
    pub(crate) yt_dlp_path: String,
    #[serde(default = "default_ffmpeg_path")]
    pub(crate) ffmpeg_path: String,
    #[serde(default = "default_ffprobe_path")]
    pub(crate) ffprobe_path: String,
    #[serde(default = "default_download_directory")]
    pub(crate) download_directory: String,
    #[serde(default = "default_song_directory")]
    pub(crate) song_directory: String,
    #[serde(default = "default_song_url_prefix")]
    pub(crate) song_url_prefix: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    #[serde(default = "default_bind_address")]
    pub(crate) bind_address: String,
    #[serde(default = "default_shutdown_timeout")]
    pub(crate) shutdown_timeout: u64,
    #[serde(default = "default_detail_fetch_concurrency")]
    pub(crate) detail_fetch_concurrency: usize,
    #[serde(default)]
    pub(crate) song_storage_directory: Option<String>,
    #[serde(flatten)]
    pub(crate) credentials: ProviderCredentials,
    #[serde(flatten)]
    pub(crate) media: MediaConfig,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        match envy::from_env::<Self>() {
            Ok(config) => config,
            Err(error) => panic!("Missing environment variable: {:#?}", error),
        }
    }
}
