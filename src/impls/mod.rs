mod catalogs;
mod media;
mod song_storage;
