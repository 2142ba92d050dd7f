use crate::{ProcessError, ProcessOutcome, ProgressReporter, Tool};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, trace};

const TOOL_NAME: &str = "yt-dlp";
const EXTRACT_AUDIO_PREFIX: &str = "[ExtractAudio] ";
const DESTINATION_PREFIX: &str = "Destination: ";
const NOT_CONVERTING_PREFIX: &str = "Not converting audio ";
const NOT_CONVERTING_SUFFIX: &str = "; file is already in target format";
const DOWNLOAD_PREFIX: &str = "[download] ";

#[derive(Debug, PartialEq)]
pub enum DownloaderLine {
    Destination(String),
    Progress(u8),
    Other,
}

/// Classifies one line of `yt-dlp --newline` output.
pub fn classify_downloader_line(line: &str) -> DownloaderLine {
    let line = line.trim_end();

    if let Some(message) = line.strip_prefix(EXTRACT_AUDIO_PREFIX) {
        if let Some(path) = message.strip_prefix(DESTINATION_PREFIX) {
            return DownloaderLine::Destination(path.to_string());
        }

        // Audio that is already in the target format is kept as downloaded.
        if let Some(path) = message
            .strip_prefix(NOT_CONVERTING_PREFIX)
            .and_then(|rest| rest.split_once(NOT_CONVERTING_SUFFIX))
            .map(|(path, _)| path)
        {
            return DownloaderLine::Destination(path.to_string());
        }

        return DownloaderLine::Other;
    }

    let message = match line.strip_prefix(DOWNLOAD_PREFIX) {
        Some(message) => message,
        None => return DownloaderLine::Other,
    };

    let percent = match message.split_once('%') {
        Some((percent, _)) => percent.trim(),
        None => return DownloaderLine::Other,
    };

    match percent.parse::<f32>() {
        Ok(value) if value.is_finite() => DownloaderLine::Progress(value.clamp(0.0, 100.0) as u8),
        _ => DownloaderLine::Other,
    }
}

/// Downloads the audio track of a source into the download directory.
pub struct YtDlp {
    binary: PathBuf,
    output_template: String,
    source: String,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>, download_directory: &Path, source: &str) -> Self {
        let output_template = download_directory
            .join("%(id)s.%(ext)s")
            .to_string_lossy()
            .into_owned();

        Self {
            binary: binary.into(),
            output_template,
            source: source.to_string(),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "--newline".into(),
            "--extract-audio".into(),
            "-o".into(),
            self.output_template.clone(),
            // Video ids may start with a dash.
            "--".into(),
            self.source.clone(),
        ]
    }

    async fn download(
        &self,
        progress: &mut ProgressReporter,
        outcome: &mut ProcessOutcome,
    ) -> Result<(), ProcessError> {
        let args = self.args();
        debug!(?args, "Spawning {}", TOOL_NAME);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                tool: TOOL_NAME,
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(ProcessError::MissingStdout(TOOL_NAME))?;
        let mut lines = BufReader::new(stdout).lines();

        while let Some(line) = lines.next_line().await.map_err(|source| ProcessError::Read {
            tool: TOOL_NAME,
            source,
        })? {
            trace!(line = %line, "{} output", TOOL_NAME);

            match classify_downloader_line(&line) {
                DownloaderLine::Destination(path) => outcome.set_result_path(path),
                DownloaderLine::Progress(percent) => progress.report(percent),
                DownloaderLine::Other => (),
            }
        }

        let status = child.wait().await.map_err(|source| ProcessError::Read {
            tool: TOOL_NAME,
            source,
        })?;

        if !status.success() {
            return Err(ProcessError::Exit {
                tool: TOOL_NAME,
                status,
            });
        }

        if outcome.result_path().is_none() {
            return Err(ProcessError::Parse(format!(
                "{} output: no destination reported for {}",
                TOOL_NAME, self.source
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Tool for YtDlp {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    async fn run(self, progress: &mut ProgressReporter, outcome: &mut ProcessOutcome) {
        if let Err(error) = self.download(progress, outcome).await {
            outcome.record_error(error);
        }
    }
}
