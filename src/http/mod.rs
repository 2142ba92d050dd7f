mod download;
mod health;
mod metadata;
mod search;

pub(crate) use download::{download_song, download_songs, get_song};
pub(crate) use health::health_check;
pub(crate) use metadata::get_metadata;
pub(crate) use search::search;
