use crate::download::traits::*;
use crate::download::types::{Song, SongId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct MockError(pub(crate) String);

pub(crate) enum DownloadBehavior {
    Succeed(&'static str),
    NoResultPath,
    Fail(&'static str),
}

pub(crate) struct MockDownloader {
    pub(crate) behavior: DownloadBehavior,
    pub(crate) progress: Vec<u8>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl MockDownloader {
    pub(crate) fn new(behavior: DownloadBehavior, progress: &[u8]) -> Self {
        Self {
            behavior,
            progress: progress.to_vec(),
            calls: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl AudioDownloader for MockDownloader {
    async fn download(
        &self,
        source_id: &str,
        progress: UnboundedSender<u8>,
    ) -> Result<Option<PathBuf>, AudioDownloaderError> {
        self.calls.lock().unwrap().push(source_id.to_string());

        for percent in &self.progress {
            let _ = progress.send(*percent);
        }

        match self.behavior {
            DownloadBehavior::Succeed(path) => Ok(Some(PathBuf::from(path))),
            DownloadBehavior::NoResultPath => Ok(None),
            DownloadBehavior::Fail(message) => {
                Err(AudioDownloaderError(Box::new(MockError(message.into()))))
            }
        }
    }
}

pub(crate) struct MockConverter {
    pub(crate) error: Option<&'static str>,
    pub(crate) progress: Vec<u8>,
    pub(crate) calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl MockConverter {
    pub(crate) fn new(error: Option<&'static str>, progress: &[u8]) -> Self {
        Self {
            error,
            progress: progress.to_vec(),
            calls: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl AudioConverter for MockConverter {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        progress: UnboundedSender<u8>,
    ) -> Result<(), AudioConverterError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_path_buf(), output.to_path_buf()));

        for percent in &self.progress {
            let _ = progress.send(*percent);
        }

        match self.error {
            Some(message) => Err(AudioConverterError(Box::new(MockError(message.into())))),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub(crate) struct MockSongStorage {
    pub(crate) error: Option<&'static str>,
    pub(crate) songs: Mutex<HashMap<SongId, Song>>,
}

#[async_trait]
impl SongStorage for MockSongStorage {
    async fn save_song(&self, song: &Song) -> Result<SongId, SongStorageError> {
        if let Some(message) = self.error {
            return Err(SongStorageError(Box::new(MockError(message.into()))));
        }

        let song_id = SongId::generate();
        self.songs.lock().unwrap().insert(song_id, song.clone());

        Ok(song_id)
    }

    async fn load_song(&self, song_id: &SongId) -> Result<Option<Song>, SongStorageError> {
        Ok(self.songs.lock().unwrap().get(song_id).cloned())
    }
}
