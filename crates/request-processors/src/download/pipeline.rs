use crate::download::traits::{
    AudioConverter, AudioConverterError, AudioDownloader, AudioDownloaderError, SongStorage,
    SongStorageError,
};
use crate::download::types::{
    BatchReport, DownloadRequest, FailedDownload, InvalidRequestError, ProgressEvent, Song,
    Step, StoredSong,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const SONG_EXTENSION: &str = "mp3";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Invalid download request: {0}")]
    InvalidRequest(#[from] InvalidRequestError),
    #[error("Download failed: {0}")]
    Download(#[from] AudioDownloaderError),
    #[error("Downloader reported no audio file for {0}")]
    MissingResultPath(String),
    #[error("Downloaded file has no usable name: {0}")]
    InvalidDownloadedPath(String),
    #[error("Conversion failed: {0}")]
    Convert(#[from] AudioConverterError),
    #[error("Unable to save song: {0}")]
    Persist(#[from] SongStorageError),
}

pub struct DownloadConvertPipeline {
    downloader: Arc<dyn AudioDownloader>,
    converter: Arc<dyn AudioConverter>,
    song_storage: Arc<dyn SongStorage>,
    song_directory: PathBuf,
    song_url_prefix: String,
}

impl DownloadConvertPipeline {
    pub fn new(
        downloader: Arc<dyn AudioDownloader>,
        converter: Arc<dyn AudioConverter>,
        song_storage: Arc<dyn SongStorage>,
        song_directory: PathBuf,
        song_url_prefix: String,
    ) -> Self {
        Self {
            downloader,
            converter,
            song_storage,
            song_directory,
            song_url_prefix,
        }
    }

    /// Downloads, converts and stores one song. Progress of both steps is written to
    /// `events`; each step that completes ends with a `done` event at 100.
    pub async fn run(
        &self,
        request: &DownloadRequest,
        events: &mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<StoredSong, DownloadError> {
        request.validate()?;

        let source_id = request.source_id.as_str();
        info!(source_id, "Downloading song");

        let downloaded = self
            .run_step(Step::Download, events, |progress| {
                self.downloader.download(source_id, progress)
            })
            .await?
            .ok_or_else(|| DownloadError::MissingResultPath(source_id.to_string()))?;

        let output = self.output_path(&downloaded)?;
        info!(source_id, ?downloaded, ?output, "Converting song");

        self.run_step(Step::Extract, events, |progress| {
            self.converter.convert(&downloaded, &output, progress)
        })
        .await?;

        let song = Song {
            title: request.title.clone(),
            album: request.album.clone(),
            artist: request.artist.clone(),
            artwork_url: request.artwork_url.clone(),
            audio_url: self.public_url(&output)?,
        };

        let id = self.song_storage.save_song(&song).await?;
        info!(source_id, %id, "Song stored");

        Ok(StoredSong { id, song })
    }

    /// Processes every request in order and reports all outcomes at the end.
    pub async fn run_batch(&self, requests: &[DownloadRequest]) -> BatchReport {
        let mut report = BatchReport::default();

        for request in requests {
            // Batch progress is not streamed anywhere.
            let (events, _) = mpsc::unbounded_channel();

            match self.run(request, &events).await {
                Ok(stored) => report.saved.push(stored),
                Err(error) => {
                    error!(source_id = %request.source_id, %error, "Batch item failed");
                    report.failed.push(FailedDownload {
                        source: request.source_id.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        info!(
            saved = report.saved.len(),
            failed = report.failed.len(),
            "Batch processed"
        );

        report
    }

    async fn run_step<F, Fut, T, E>(
        &self,
        step: Step,
        events: &mpsc::UnboundedSender<ProgressEvent>,
        start: F,
    ) -> Result<T, E>
    where
        F: FnOnce(mpsc::UnboundedSender<u8>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let forward = async {
            while let Some(progress) = receiver.recv().await {
                let _ = events.send(ProgressEvent::running(step, progress));
            }
        };

        // The step owns the only sender, so forwarding ends together with the step.
        let (result, ()) = futures::join!(start(sender), forward);

        if result.is_ok() {
            debug!(?step, "Step finished");
            let _ = events.send(ProgressEvent::finished(step));
        }

        result
    }

    fn output_path(&self, downloaded: &Path) -> Result<PathBuf, DownloadError> {
        let stem = downloaded
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                DownloadError::InvalidDownloadedPath(downloaded.to_string_lossy().into_owned())
            })?;

        Ok(self
            .song_directory
            .join(format!("{}.{}", stem, SONG_EXTENSION)))
    }

    fn public_url(&self, output: &Path) -> Result<String, DownloadError> {
        let file_name = output
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                DownloadError::InvalidDownloadedPath(output.to_string_lossy().into_owned())
            })?;

        Ok(format!(
            "{}/{}",
            self.song_url_prefix.trim_end_matches('/'),
            file_name
        ))
    }
}
