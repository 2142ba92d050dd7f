mod ffmpeg;
mod metadata;
mod process;
mod yt_dlp;

pub use ffmpeg::*;
pub use metadata::*;
pub use process::*;
pub use yt_dlp::*;

#[cfg(all(test, unix))]
mod tests;
