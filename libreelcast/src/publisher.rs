//! Publishing a downloaded reel through a [`Platform`]
//!
//! No retries: whatever the platform raises is returned as-is.

use std::path::Path;

use crate::error::{MediaError, PlatformError, Result};
use crate::platforms::Platform;
use crate::types::{PublishResult, VideoUpload};

/// Publish raw video bytes with a caption and optional cover
///
/// # Errors
///
/// `PlatformError::Validation` for an empty video, without contacting the
/// platform. Otherwise the platform's own error.
pub async fn publish(
    platform: &dyn Platform,
    video: Vec<u8>,
    caption: &str,
    cover: Option<Vec<u8>>,
) -> Result<PublishResult> {
    if video.is_empty() {
        return Err(PlatformError::Validation("Video payload is empty".to_string()).into());
    }

    tracing::debug!(
        "Publishing {} bytes to {} (cover: {})",
        video.len(),
        platform.name(),
        cover.is_some()
    );

    let upload = VideoUpload {
        video,
        caption: caption.to_string(),
        cover,
    };
    platform.publish(&upload).await
}

/// Read the scratch files back from disk and [`publish`] them
pub async fn publish_files(
    platform: &dyn Platform,
    video_path: &Path,
    caption: &str,
    cover_path: Option<&Path>,
) -> Result<PublishResult> {
    let video = tokio::fs::read(video_path)
        .await
        .map_err(|e| MediaError::io(format!("reading {}", video_path.display()), e))?;

    let cover = match cover_path {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .map_err(|e| MediaError::io(format!("reading {}", path.display()), e))?,
        ),
        None => None,
    };

    publish(platform, video, caption, cover).await
}
