use crate::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

fn write_script(directory: &Path, name: &str, body: &str) -> PathBuf {
    let path = directory.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn received(receiver: &mut mpsc::UnboundedReceiver<u8>) -> Vec<u8> {
    let mut percents = vec![];
    while let Ok(percent) = receiver.try_recv() {
        percents.push(percent);
    }
    percents
}

async fn run_to_end<T: Tool>(tool: T, progress: ProgressReporter) -> ProcessRunner {
    let mut runner = ProcessRunner::new();
    runner.start(tool, progress).unwrap();
    runner.wait().await;
    runner
}

#[actix_rt::test]
async fn test_downloader_reports_destination_and_progress() {
    let directory = tempfile::tempdir().unwrap();
    let binary = write_script(
        directory.path(),
        "yt-dlp",
        "printf '[download]  10.0%% of 1MiB\\n[download]  55.5%% of 1MiB\\n[download] 100%% of 1MiB\\n[ExtractAudio] Destination: downloads/abc.opus\\n'",
    );
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let runner = run_to_end(
        YtDlp::new(binary, Path::new("downloads"), "abc"),
        ProgressReporter::new(sender),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Succeeded);
    assert_eq!(
        runner.outcome().unwrap().result_path(),
        Some("downloads/abc.opus")
    );
    assert_eq!(received(&mut receiver), vec![10, 55, 100]);
}

#[actix_rt::test]
async fn test_downloader_non_zero_exit_fails() {
    let directory = tempfile::tempdir().unwrap();
    let binary = write_script(
        directory.path(),
        "yt-dlp",
        "echo '[ExtractAudio] Destination: downloads/abc.opus'\nexit 1",
    );

    let runner = run_to_end(
        YtDlp::new(binary, Path::new("downloads"), "abc"),
        ProgressReporter::silent(),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Failed);
    assert!(matches!(
        runner.outcome().unwrap().error(),
        Some(ProcessError::Exit { tool: "yt-dlp", .. })
    ));
}

#[actix_rt::test]
async fn test_downloader_without_destination_fails() {
    let directory = tempfile::tempdir().unwrap();
    let binary = write_script(directory.path(), "yt-dlp", "echo '[download] 100% of 1MiB'");

    let runner = run_to_end(
        YtDlp::new(binary, Path::new("downloads"), "abc"),
        ProgressReporter::silent(),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Failed);
    assert!(matches!(
        runner.outcome().unwrap().error(),
        Some(ProcessError::Parse(_))
    ));
}

#[actix_rt::test]
async fn test_missing_binary_fails_to_spawn() {
    let runner = run_to_end(
        YtDlp::new("/nonexistent/yt-dlp", Path::new("downloads"), "abc"),
        ProgressReporter::silent(),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Failed);
    assert!(matches!(
        runner.outcome().unwrap().error(),
        Some(ProcessError::Spawn { tool: "yt-dlp", .. })
    ));
}

#[actix_rt::test]
async fn test_transcoder_reports_progress_and_removes_input() {
    let directory = tempfile::tempdir().unwrap();
    let ffprobe = write_script(
        directory.path(),
        "ffprobe",
        r#"echo '{"format":{"duration":"10.000000"}}'"#,
    );
    let ffmpeg = write_script(
        directory.path(),
        "ffmpeg",
        "printf 'out_time_us=N/A\\nout_time_us=2500000\\nout_time_us=7500000\\nout_time_us=12000000\\nprogress=end\\n'",
    );
    let input = directory.path().join("abc.opus");
    let output = directory.path().join("abc.mp3");
    fs::write(&input, b"audio").unwrap();
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let runner = run_to_end(
        Ffmpeg::new(ffmpeg, ffprobe, &input, &output),
        ProgressReporter::new(sender),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Succeeded);
    assert_eq!(
        runner.outcome().unwrap().result_path(),
        Some(output.to_string_lossy().as_ref())
    );
    assert_eq!(received(&mut receiver), vec![25, 75, 100]);
    assert!(!input.exists());
}

#[actix_rt::test]
async fn test_transcoder_unparsable_progress_keeps_input() {
    let directory = tempfile::tempdir().unwrap();
    let ffprobe = write_script(
        directory.path(),
        "ffprobe",
        r#"echo '{"format":{"duration":"10.0"}}'"#,
    );
    let ffmpeg = write_script(
        directory.path(),
        "ffmpeg",
        "printf 'out_time_us=garbage\\nout_time_us=also-garbage\\nout_time_us=5000000\\n'",
    );
    let input = directory.path().join("abc.opus");
    fs::write(&input, b"audio").unwrap();

    let runner = run_to_end(
        Ffmpeg::new(ffmpeg, ffprobe, &input, directory.path().join("abc.mp3")),
        ProgressReporter::silent(),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Failed);
    let outcome = runner.outcome().unwrap();
    assert_eq!(
        outcome.error().map(ToString::to_string).as_deref(),
        Some(r#"Unable to parse progress value "garbage""#)
    );
    assert!(outcome.result_path().is_none());
    assert!(input.exists());
}

#[actix_rt::test]
async fn test_transcoder_zero_duration_fails_before_transcoding() {
    let directory = tempfile::tempdir().unwrap();
    let ffprobe = write_script(
        directory.path(),
        "ffprobe",
        r#"echo '{"format":{"duration":"0.000000"}}'"#,
    );
    let marker = directory.path().join("ffmpeg-was-run");
    let ffmpeg = write_script(
        directory.path(),
        "ffmpeg",
        &format!("touch '{}'", marker.display()),
    );
    let input = directory.path().join("abc.opus");
    fs::write(&input, b"audio").unwrap();

    let runner = run_to_end(
        Ffmpeg::new(ffmpeg, ffprobe, &input, directory.path().join("abc.mp3")),
        ProgressReporter::silent(),
    )
    .await;

    assert_eq!(runner.state(), RunnerState::Failed);
    assert!(!marker.exists());
    assert!(input.exists());
}

#[actix_rt::test]
async fn test_fetch_video_metadata() {
    let directory = tempfile::tempdir().unwrap();
    let binary = write_script(
        directory.path(),
        "yt-dlp",
        r#"echo '{"id":"abc","title":"Title","artist":"Artist","duration":61.5}'"#,
    );

    let metadata = fetch_video_metadata(&binary, "abc").await.unwrap();

    assert_eq!(metadata.id, "abc");
    assert_eq!(metadata.display_title(), "Title");
    assert_eq!(metadata.display_artist(), "Artist");
    assert_eq!(metadata.summarize().duration, 61);
}
