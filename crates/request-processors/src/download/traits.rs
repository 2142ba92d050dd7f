use crate::download::types::{Song, SongId};
use async_trait::async_trait;
use std::fmt::Formatter;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, thiserror::Error)]
pub struct AudioDownloaderError(pub Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for AudioDownloaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait AudioDownloader: Send + Sync {
    /// Downloads the audio of `source_id` and returns the path of the extracted file, if any
    /// was reported. Percentages are sent on `progress` until the download finishes.
    async fn download(
        &self,
        source_id: &str,
        progress: UnboundedSender<u8>,
    ) -> Result<Option<PathBuf>, AudioDownloaderError>;
}

#[derive(Debug, thiserror::Error)]
pub struct AudioConverterError(pub Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for AudioConverterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        progress: UnboundedSender<u8>,
    ) -> Result<(), AudioConverterError>;
}

#[derive(Debug, thiserror::Error)]
pub struct SongStorageError(pub Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for SongStorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait SongStorage: Send + Sync {
    async fn save_song(&self, song: &Song) -> Result<SongId, SongStorageError>;
    async fn load_song(&self, song_id: &SongId) -> Result<Option<Song>, SongStorageError>;
}
