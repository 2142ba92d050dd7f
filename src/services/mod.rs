mod audio_converter;
pub(crate) use audio_converter::*;

mod audio_downloader;
pub(crate) use audio_downloader::*;

mod catalogs;
pub(crate) use catalogs::*;
