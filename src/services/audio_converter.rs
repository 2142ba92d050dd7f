use media_tools::{Ffmpeg, ProcessError, ProcessRunner, ProgressReporter};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

pub(crate) struct AudioConvertService {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl AudioConvertService {
    pub(crate) fn new(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    pub(crate) async fn convert(
        &self,
        input: &Path,
        output: &Path,
        progress: UnboundedSender<u8>,
    ) -> Result<(), ProcessError> {
        let tool = Ffmpeg::new(&self.ffmpeg_path, &self.ffprobe_path, input, output);

        let mut runner = ProcessRunner::new();
        runner.start(tool, ProgressReporter::new(progress))?;
        runner.wait().await;

        debug!(?input, ?output, state = ?runner.state(), "Converter finished");

        match runner.into_outcome() {
            Some(outcome) => outcome.into_result().map(|_| ()),
            None => Err(ProcessError::TaskFailed(
                "converter finished without an outcome".into(),
            )),
        }
    }
}
