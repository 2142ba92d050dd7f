use serde::{Deserialize, Serialize};
use std::ops::Deref;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadRequest {
    pub title: String,
    pub album: String,
    pub artist: String,
    #[serde(rename = "artwork")]
    pub artwork_url: String,
    #[serde(rename = "source")]
    pub source_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequestError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("source must not be empty")]
    EmptySource,
}

impl DownloadRequest {
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.title.trim().is_empty() {
            return Err(InvalidRequestError::EmptyTitle);
        }

        if self.source_id.trim().is_empty() {
            return Err(InvalidRequestError::EmptySource);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub title: String,
    pub album: String,
    pub artist: String,
    #[serde(rename = "artwork")]
    pub artwork_url: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Deref for SongId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Uuid> for SongId {
    fn from(uuid: Uuid) -> Self {
        SongId(uuid)
    }
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSong {
    pub id: SongId,
    pub song: Song,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Download,
    Extract,
}

impl Step {
    pub const ALL: [Step; 2] = [Step::Download, Step::Extract];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: Step,
    pub progress: u8,
    pub done: bool,
}

impl ProgressEvent {
    pub fn running(step: Step, progress: u8) -> Self {
        Self {
            step,
            progress: progress.min(100),
            done: false,
        }
    }

    pub fn finished(step: Step) -> Self {
        Self {
            step,
            progress: 100,
            done: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDownload {
    pub source: String,
    pub error: String,
}

/// Outcome of a batch: every request ends up in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub saved: Vec<StoredSong>,
    pub failed: Vec<FailedDownload>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
