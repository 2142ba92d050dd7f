use media_tools::{
    fetch_video_metadata, ProcessError, ProcessRunner, ProgressReporter, VideoMetadata, YtDlp,
};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

pub(crate) struct AudioDownloadService {
    yt_dlp_path: PathBuf,
    download_directory: PathBuf,
}

impl AudioDownloadService {
    pub(crate) fn new(yt_dlp_path: impl Into<PathBuf>, download_directory: impl Into<PathBuf>) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
            download_directory: download_directory.into(),
        }
    }

    pub(crate) async fn download(
        &self,
        source_id: &str,
        progress: UnboundedSender<u8>,
    ) -> Result<Option<String>, ProcessError> {
        let tool = YtDlp::new(&self.yt_dlp_path, &self.download_directory, source_id);

        let mut runner = ProcessRunner::new();
        runner.start(tool, ProgressReporter::new(progress))?;
        runner.wait().await;

        debug!(source_id, state = ?runner.state(), "Downloader finished");

        match runner.into_outcome() {
            Some(outcome) => outcome.into_result(),
            None => Err(ProcessError::TaskFailed(
                "downloader finished without an outcome".into(),
            )),
        }
    }

    pub(crate) async fn fetch_metadata(&self, source: &str) -> Result<VideoMetadata, ProcessError> {
        fetch_video_metadata(&self.yt_dlp_path, source).await
    }
}
