//! Cover image extraction
//!
//! One still frame is sampled at a fixed offset into the video and scaled to
//! a fixed width, keeping the aspect ratio.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::MediaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailOptions {
    pub offset_secs: u32,
    pub width: u32,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            offset_secs: 1,
            width: 640,
        }
    }
}

#[async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Write exactly one frame of `video` to `thumbnail`
    async fn extract_frame(
        &self,
        video: &Path,
        thumbnail: &Path,
        options: ThumbnailOptions,
    ) -> Result<(), MediaError>;
}

/// Frame extraction through an `ffmpeg` executable
#[derive(Debug, Clone)]
pub struct FfmpegThumbnailer {
    binary: PathBuf,
}

impl Default for FfmpegThumbnailer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegThumbnailer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn args(video: &Path, thumbnail: &Path, options: ThumbnailOptions) -> Vec<OsString> {
        vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-ss".into(),
            options.offset_secs.to_string().into(),
            "-i".into(),
            video.into(),
            "-frames:v".into(),
            "1".into(),
            "-vf".into(),
            format!("scale={}:-1", options.width).into(),
            thumbnail.into(),
        ]
    }
}

#[async_trait]
impl FrameExtractor for FfmpegThumbnailer {
    async fn extract_frame(
        &self,
        video: &Path,
        thumbnail: &Path,
        options: ThumbnailOptions,
    ) -> Result<(), MediaError> {
        let output = Command::new(&self.binary)
            .args(Self::args(video, thumbnail, options))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                MediaError::Thumbnail(format!("failed to run {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::Thumbnail(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        // ffmpeg exits cleanly without writing a frame when the offset is past the end
        match tokio::fs::metadata(thumbnail).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(MediaError::Thumbnail(format!(
                "no frame at {}s in {}",
                options.offset_secs,
                video.display()
            ))),
        }
    }
}
