use crate::{ProcessError, ProcessOutcome, ProgressReporter, Tool};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, trace, warn};

const FFMPEG: &str = "ffmpeg";
const FFPROBE: &str = "ffprobe";
const PROGRESS_KEY: &str = "out_time_us=";
const UNKNOWN_VALUE: &str = "N/A";
const FRACTION_DIGITS: usize = 6;

#[derive(Deserialize)]
struct ProbeResult {
    format: ProbeFormat,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Parses an ffprobe duration of the form `SS.ffffff` into milliseconds.
pub fn parse_probe_duration(value: &str) -> Result<u64, ProcessError> {
    let invalid = || ProcessError::Parse(format!("duration {:?}", value));
    let value = value.trim();

    let (seconds, fraction) = value.split_once('.').unwrap_or((value, ""));
    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
    let micros: u64 = format!("{:0<width$.width$}", fraction, width = FRACTION_DIGITS)
        .parse()
        .map_err(|_| invalid())?;

    seconds
        .checked_mul(1000)
        .and_then(|millis| millis.checked_add(micros / 1000))
        .ok_or_else(invalid)
}

/// Extracts the container duration in milliseconds from `ffprobe -print_format json -show_format`.
pub fn parse_probe_output(output: &[u8]) -> Result<u64, ProcessError> {
    let result: ProbeResult = serde_json::from_slice(output)?;
    let duration = result
        .format
        .duration
        .ok_or_else(|| ProcessError::Parse("duration: not present in probe output".into()))?;

    match parse_probe_duration(&duration)? {
        0 => Err(ProcessError::Parse(format!("duration {:?}: zero length", duration))),
        millis => Ok(millis),
    }
}

#[derive(Debug, PartialEq)]
pub enum TranscoderLine {
    /// Elapsed output time in microseconds.
    OutTime(u64),
    Unknown,
    Other,
}

/// Classifies one line of `ffmpeg -progress` output.
pub fn classify_transcoder_line(line: &str) -> Result<TranscoderLine, ProcessError> {
    let value = match line.trim_end().strip_prefix(PROGRESS_KEY) {
        Some(value) => value.trim(),
        None => return Ok(TranscoderLine::Other),
    };

    if value == UNKNOWN_VALUE {
        return Ok(TranscoderLine::Unknown);
    }

    // Negative values show up for inputs with a negative start time.
    value
        .parse::<i64>()
        .map(|micros| TranscoderLine::OutTime(micros.max(0) as u64))
        .map_err(|_| ProcessError::Parse(format!("progress value {:?}", value)))
}

pub fn progress_percent(elapsed_micros: u64, total_millis: u64) -> u8 {
    if total_millis == 0 {
        return 100;
    }

    let elapsed_millis = (elapsed_micros / 1000).min(total_millis);

    (elapsed_millis * 100 / total_millis) as u8
}

/// Transcodes a downloaded file to the output path and removes the input on success.
pub struct Ffmpeg {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    input: PathBuf,
    output: PathBuf,
}

impl Ffmpeg {
    pub fn new(
        ffmpeg: impl Into<PathBuf>,
        ffprobe: impl Into<PathBuf>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn probe_args(&self) -> Vec<String> {
        vec![
            "-v".into(),
            "quiet".into(),
            "-print_format".into(),
            "json".into(),
            "-show_format".into(),
            self.input.to_string_lossy().into_owned(),
        ]
    }

    pub fn transcode_args(&self) -> Vec<String> {
        vec![
            "-nostdin".into(),
            "-i".into(),
            self.input.to_string_lossy().into_owned(),
            "-progress".into(),
            "pipe:1".into(),
            "-y".into(),
            self.output.to_string_lossy().into_owned(),
        ]
    }

    async fn probe_duration(&self) -> Result<u64, ProcessError> {
        let output = Command::new(&self.ffprobe)
            .args(self.probe_args())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                tool: FFPROBE,
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessError::Exit {
                tool: FFPROBE,
                status: output.status,
            });
        }

        parse_probe_output(&output.stdout)
    }

    async fn transcode(
        &self,
        progress: &mut ProgressReporter,
        outcome: &mut ProcessOutcome,
    ) -> Result<(), ProcessError> {
        let total_millis = self.probe_duration().await?;
        debug!(input = ?self.input, total_millis, "Probed input duration");

        let args = self.transcode_args();
        debug!(?args, "Spawning {}", FFMPEG);

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                tool: FFMPEG,
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(ProcessError::MissingStdout(FFMPEG))?;
        let mut lines = BufReader::new(stdout).lines();

        while let Some(line) = lines.next_line().await.map_err(|source| ProcessError::Read {
            tool: FFMPEG,
            source,
        })? {
            trace!(line = %line, "{} output", FFMPEG);

            match classify_transcoder_line(&line) {
                Ok(TranscoderLine::OutTime(micros)) => {
                    progress.report(progress_percent(micros, total_millis))
                }
                Ok(TranscoderLine::Unknown | TranscoderLine::Other) => (),
                // Keep draining so the child never blocks on a full pipe.
                Err(error) => outcome.record_error(error),
            }
        }

        let status = child.wait().await.map_err(|source| ProcessError::Read {
            tool: FFMPEG,
            source,
        })?;

        if !status.success() {
            return Err(ProcessError::Exit {
                tool: FFMPEG,
                status,
            });
        }

        if outcome.has_failed() {
            return Ok(());
        }

        if let Err(source) = tokio::fs::remove_file(&self.input).await {
            warn!(input = ?self.input, ?source, "Unable to remove transcoded input");
            return Err(ProcessError::Cleanup {
                path: self.input.to_string_lossy().into_owned(),
                source,
            });
        }

        outcome.set_result_path(self.output.to_string_lossy().into_owned());

        Ok(())
    }
}

#[async_trait]
impl Tool for Ffmpeg {
    fn name(&self) -> &'static str {
        FFMPEG
    }

    async fn run(self, progress: &mut ProgressReporter, outcome: &mut ProcessOutcome) {
        if let Err(error) = self.transcode(progress, outcome).await {
            outcome.record_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_duration() {
        assert_eq!(parse_probe_duration("213.061000").unwrap(), 213_061);
        assert_eq!(parse_probe_duration("12.5").unwrap(), 12_500);
        assert_eq!(parse_probe_duration("7").unwrap(), 7_000);
        assert_eq!(parse_probe_duration("1.0019999").unwrap(), 1_001);
        assert_eq!(parse_probe_duration("0.000999").unwrap(), 0);
    }

    #[test]
    fn test_parse_probe_duration_rejects_malformed_values() {
        for value in ["", ".5", "abc", "1.2.3", "-1.0", "1.x"] {
            assert!(
                matches!(parse_probe_duration(value), Err(ProcessError::Parse(_))),
                "{:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_parse_probe_output() {
        let output = include_bytes!("fixtures/ffprobe_output.json");

        assert_eq!(parse_probe_output(output).unwrap(), 213_061);
    }

    #[test]
    fn test_parse_probe_output_without_usable_duration() {
        assert!(matches!(
            parse_probe_output(br#"{"format":{}}"#),
            Err(ProcessError::Parse(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{"format":{"duration":"0.000000"}}"#),
            Err(ProcessError::Parse(_))
        ));
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(ProcessError::Json(_))
        ));
    }

    #[test]
    fn test_classify_transcoder_lines() {
        assert_eq!(
            classify_transcoder_line("out_time_us=106500000").unwrap(),
            TranscoderLine::OutTime(106_500_000)
        );
        assert_eq!(
            classify_transcoder_line("out_time_us=-7000").unwrap(),
            TranscoderLine::OutTime(0)
        );
        assert_eq!(
            classify_transcoder_line("out_time_us=N/A").unwrap(),
            TranscoderLine::Unknown
        );
        assert_eq!(
            classify_transcoder_line("out_time_ms=106500000").unwrap(),
            TranscoderLine::Other
        );
        assert!(classify_transcoder_line("out_time_us=soon").is_err());
    }

    #[test]
    fn test_progress_over_fixture() {
        let percents: Vec<u8> = include_str!("fixtures/ffmpeg_progress.txt")
            .lines()
            .filter_map(|line| match classify_transcoder_line(line).unwrap() {
                TranscoderLine::OutTime(micros) => Some(progress_percent(micros, 213_061)),
                _ => None,
            })
            .collect();

        assert_eq!(percents, vec![49, 100]);
    }

    #[test]
    fn test_progress_percent_is_clamped() {
        assert_eq!(progress_percent(0, 1_000), 0);
        assert_eq!(progress_percent(500_000, 1_000), 50);
        assert_eq!(progress_percent(5_000_000, 1_000), 100);
        assert_eq!(progress_percent(5_000_000, 0), 100);
    }

    #[test]
    fn test_args() {
        let tool = Ffmpeg::new("ffmpeg", "ffprobe", "downloads/a.opus", "static/song/a.mp3");

        assert_eq!(
            tool.probe_args(),
            vec!["-v", "quiet", "-print_format", "json", "-show_format", "downloads/a.opus"]
        );
        assert_eq!(
            tool.transcode_args(),
            vec![
                "-nostdin",
                "-i",
                "downloads/a.opus",
                "-progress",
                "pipe:1",
                "-y",
                "static/song/a.mp3"
            ]
        );
    }
}
