use crate::storage::on_disk::OnDiskStorage;
use crate::storage::InMemoryStorage;
use async_trait::async_trait;
use request_processors::{Song, SongId, SongStorage, SongStorageError};

pub(crate) const SONG_PREFIX: &str = "songs";

fn song_key(song_id: &SongId) -> String {
    format!("{}.json", song_id)
}

#[async_trait]
impl SongStorage for OnDiskStorage {
    async fn save_song(&self, song: &Song) -> Result<SongId, SongStorageError> {
        let song_id = SongId::generate();
        let song_str =
            serde_json::to_string(song).map_err(|error| SongStorageError(Box::new(error)))?;

        self.save(SONG_PREFIX, &song_key(&song_id), &song_str)
            .await
            .map_err(|error| SongStorageError(Box::new(error)))?;

        Ok(song_id)
    }

    async fn load_song(&self, song_id: &SongId) -> Result<Option<Song>, SongStorageError> {
        let song_str = match self
            .get(SONG_PREFIX, &song_key(song_id))
            .await
            .map_err(|error| SongStorageError(Box::new(error)))?
        {
            Some(song_str) => song_str,
            None => return Ok(None),
        };

        serde_json::from_str(&song_str)
            .map(Some)
            .map_err(|error| SongStorageError(Box::new(error)))
    }
}

#[async_trait]
impl SongStorage for InMemoryStorage {
    async fn save_song(&self, song: &Song) -> Result<SongId, SongStorageError> {
        let song_id = SongId::generate();

        self.insert(song_id, song.clone());

        Ok(song_id)
    }

    async fn load_song(&self, song_id: &SongId) -> Result<Option<Song>, SongStorageError> {
        Ok(self.get(song_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song() -> Song {
        Song {
            title: "Never Gonna Give You Up".into(),
            album: "Whenever You Need Somebody".into(),
            artist: "Rick Astley".into(),
            artwork_url: "https://i.scdn.co/image/640".into(),
            audio_url: "/song/dQw4w9WgXcQ.mp3".into(),
        }
    }

    #[actix_rt::test]
    async fn test_on_disk_song_storage() {
        let directory = tempfile::tempdir().unwrap();
        let storage = OnDiskStorage::create(directory.path());

        let song_id = storage.save_song(&song()).await.unwrap();

        assert_eq!(storage.load_song(&song_id).await.unwrap(), Some(song()));
        assert!(directory
            .path()
            .join(SONG_PREFIX)
            .join(format!("{}.json", song_id))
            .is_file());
        assert_eq!(
            storage.load_song(&SongId::generate()).await.unwrap(),
            None
        );
    }

    #[actix_rt::test]
    async fn test_in_memory_song_storage() {
        let storage = InMemoryStorage::new();

        let first = storage.save_song(&song()).await.unwrap();
        let second = storage.save_song(&song()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(storage.load_song(&first).await.unwrap(), Some(song()));
        assert_eq!(
            storage.load_song(&SongId::generate()).await.unwrap(),
            None
        );
    }
}
