//! Video downloads into scratch files

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::MediaError;

/// Something that can place a remote video at a local path
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Download `url` to `destination`, overwriting any existing file
    ///
    /// Leaves whatever was written in place on failure; removing it is the
    /// caller's job.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), MediaError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpMediaSource {
    client: Client,
}

impl HttpMediaSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), MediaError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| MediaError::Download {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(MediaError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content_length = response.content_length();
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(destination)
            .await
            .map_err(|e| MediaError::io(format!("opening {}", destination.display()), e))?;

        let mut bytes_written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| {
                tracing::warn!(
                    "Body error for {} (content_length={:?}, bytes_so_far={}): {}",
                    url,
                    content_length,
                    bytes_written,
                    source
                );
                MediaError::Download {
                    url: url.to_string(),
                    source,
                }
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| MediaError::io(format!("writing {}", destination.display()), e))?;
            bytes_written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| MediaError::io(format!("flushing {}", destination.display()), e))?;
        drop(file);

        // Check what actually landed on disk, not what we think we wrote
        let size = tokio::fs::metadata(destination)
            .await
            .map_err(|e| MediaError::io(format!("inspecting {}", destination.display()), e))?
            .len();
        if size == 0 {
            return Err(MediaError::EmptyDownload {
                url: url.to_string(),
            });
        }

        tracing::debug!("Downloaded {} bytes from {}", size, url);
        Ok(())
    }
}
