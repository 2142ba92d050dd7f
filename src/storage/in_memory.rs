use request_processors::{Song, SongId};
use std::collections::HashMap;
use std::sync::Mutex;

/// Song records kept for the lifetime of the process.
pub(crate) struct InMemoryStorage {
    songs: Mutex<HashMap<SongId, Song>>,
}

impl InMemoryStorage {
    pub(crate) fn new() -> Self {
        Self {
            songs: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn insert(&self, song_id: SongId, song: Song) {
        let mut guard = self.songs.lock().unwrap();

        guard.insert(song_id, song);
    }

    pub(crate) fn get(&self, song_id: &SongId) -> Option<Song> {
        let guard = self.songs.lock().unwrap();

        guard.get(song_id).cloned()
    }
}
