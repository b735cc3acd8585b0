//! Per-iteration scratch files
//!
//! Each pipeline iteration gets freshly named video and thumbnail paths. They
//! are removed by [`ScratchFiles::release`] at the end of the iteration; if
//! the guard is dropped without being released (panic, early return) the
//! files are removed synchronously in `Drop`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::MediaError;

#[derive(Debug)]
pub struct ScratchFiles {
    video: PathBuf,
    thumbnail: PathBuf,
    released: bool,
}

impl ScratchFiles {
    /// Reserve unique paths inside `dir`, creating the directory if needed
    ///
    /// No files are created; the fetcher and thumbnailer write them.
    pub async fn acquire(dir: &Path) -> Result<Self, MediaError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| MediaError::io(format!("creating scratch dir {}", dir.display()), e))?;

        let stem = format!("reel-{}", Uuid::new_v4().simple());
        Ok(Self {
            video: dir.join(format!("{}.mp4", stem)),
            thumbnail: dir.join(format!("{}.jpg", stem)),
            released: false,
        })
    }

    pub fn video(&self) -> &Path {
        &self.video
    }

    pub fn thumbnail(&self) -> &Path {
        &self.thumbnail
    }

    /// Delete both files
    ///
    /// Files that never got written are fine; any other failure is logged
    /// and otherwise ignored.
    pub async fn release(mut self) {
        for path in [&self.video, &self.thumbnail] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::debug!("Removed scratch file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to remove scratch file {}: {}", path.display(), e)
                }
            }
        }
        self.released = true;
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        for path in [&self.video, &self.thumbnail] {
            let _ = std::fs::remove_file(path);
        }
    }
}
