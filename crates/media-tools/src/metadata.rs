use crate::ProcessError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

const TOOL_NAME: &str = "yt-dlp";

/// Subset of the `yt-dlp -j` info document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VideoMetadata {
    pub id: String,
    pub title: Option<String>,
    pub alt_title: Option<String>,
    pub track: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub creator: Option<String>,
    pub uploader: Option<String>,
    pub album: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
}

/// Prefill for a download request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMetadata {
    #[serde(rename = "source")]
    pub source_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "artwork")]
    pub artwork_url: String,
    pub duration: i64,
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> &'a str {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_deref())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

impl VideoMetadata {
    pub fn display_title(&self) -> &str {
        first_present(&[&self.track, &self.alt_title, &self.title])
    }

    pub fn display_artist(&self) -> &str {
        first_present(&[
            &self.artist,
            &self.album_artist,
            &self.creator,
            &self.uploader,
        ])
    }

    pub fn summarize(&self) -> SourceMetadata {
        SourceMetadata {
            source_id: self.id.clone(),
            title: self.display_title().to_string(),
            artist: self.display_artist().to_string(),
            album: first_present(&[&self.album]).to_string(),
            artwork_url: first_present(&[&self.thumbnail]).to_string(),
            duration: self
                .duration
                .filter(|duration| duration.is_finite() && *duration >= 0.0)
                .map(|duration| duration as i64)
                .unwrap_or(-1),
        }
    }
}

pub fn parse_video_metadata(output: &[u8]) -> Result<VideoMetadata, ProcessError> {
    Ok(serde_json::from_slice(output)?)
}

/// Runs `yt-dlp -j` against the source without downloading anything.
pub async fn fetch_video_metadata(
    binary: &Path,
    source: &str,
) -> Result<VideoMetadata, ProcessError> {
    debug!(source, "Probing source metadata");

    let output = Command::new(binary)
        .args(["-j", "--no-playlist", "--", source])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            tool: TOOL_NAME,
            source,
        })?;

    if !output.status.success() {
        return Err(ProcessError::Exit {
            tool: TOOL_NAME,
            status: output.status,
        });
    }

    parse_video_metadata(&output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_chains() {
        let metadata = parse_video_metadata(include_bytes!("fixtures/yt_dlp_metadata.json")).unwrap();

        assert_eq!(metadata.display_title(), "Never Gonna Give You Up");
        assert_eq!(metadata.display_artist(), "Rick Astley");
        assert_eq!(
            metadata.summarize(),
            SourceMetadata {
                source_id: "dQw4w9WgXcQ".into(),
                title: "Never Gonna Give You Up".into(),
                artist: "Rick Astley".into(),
                album: "Whenever You Need Somebody".into(),
                artwork_url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".into(),
                duration: 212,
            }
        );
    }

    #[test]
    fn test_sparse_document() {
        let metadata = parse_video_metadata(br#"{"id":"x","title":"Clip","uploader":"Channel"}"#)
            .unwrap();
        let summary = metadata.summarize();

        assert_eq!(summary.title, "Clip");
        assert_eq!(summary.artist, "Channel");
        assert_eq!(summary.album, "");
        assert_eq!(summary.duration, -1);
    }
}
