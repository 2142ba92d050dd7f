use crate::services::{AudioConvertService, AudioDownloadService};
use async_trait::async_trait;
use request_processors::{
    AudioConverter, AudioConverterError, AudioDownloader, AudioDownloaderError,
};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

#[async_trait]
impl AudioDownloader for AudioDownloadService {
    async fn download(
        &self,
        source_id: &str,
        progress: UnboundedSender<u8>,
    ) -> Result<Option<PathBuf>, AudioDownloaderError> {
        AudioDownloadService::download(self, source_id, progress)
            .await
            .map(|path| path.map(PathBuf::from))
            .map_err(|error| AudioDownloaderError(Box::new(error)))
    }
}

#[async_trait]
impl AudioConverter for AudioConvertService {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        progress: UnboundedSender<u8>,
    ) -> Result<(), AudioConverterError> {
        AudioConvertService::convert(self, input, output, progress)
            .await
            .map_err(|error| AudioConverterError(Box::new(error)))
    }
}
