//! Local media handling: downloads, cover frames and scratch files

pub mod fetch;
pub mod scratch;
pub mod thumbnail;

pub use fetch::{HttpMediaSource, MediaSource};
pub use scratch::ScratchFiles;
pub use thumbnail::{FfmpegThumbnailer, FrameExtractor, ThumbnailOptions};
