//! The upload run: manifest in, published reels and history records out
//!
//! Entries are handled one at a time, in manifest order:
//!
//! ```text
//! Pending -> Skipped
//! Pending -> Fetching -> [Deriving] -> Publishing -> Recorded -> CleanedUp
//! Pending -> ... -> Failed -> CleanedUp
//! ```
//!
//! A failure while fetching, deriving or publishing only fails that entry.
//! A failure to persist history ends the run, since the ledger is the only
//! thing preventing duplicate posts.

use std::path::PathBuf;

use tracing::{debug, error, info};

use super::events::{Event, EventBus, EventReceiver};
use crate::config::Config;
use crate::error::Result;
use crate::history::{HistoryLedger, HistoryRecord};
use crate::manifest::Manifest;
use crate::media::{FrameExtractor, MediaSource, ScratchFiles, ThumbnailOptions};
use crate::platforms::Platform;
use crate::publisher;
use crate::types::PublishResult;

#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Stop once this many entries were published in the run
    pub cap: usize,
    pub scratch_dir: PathBuf,
    pub thumbnail: ThumbnailOptions,
}

impl UploadOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cap: config.upload.cap,
            scratch_dir: config.paths.scratch_dir_path(),
            thumbnail: ThumbnailOptions {
                offset_secs: config.upload.thumbnail_offset_secs,
                width: config.upload.thumbnail_width,
            },
        }
    }
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub published: usize,
    pub skipped: usize,
    pub unavailable: usize,
    pub failed: usize,
    pub cap_reached: bool,
}

pub struct UploadService {
    platform: Box<dyn Platform>,
    source: Box<dyn MediaSource>,
    extractor: Option<Box<dyn FrameExtractor>>,
    ledger: HistoryLedger,
    options: UploadOptions,
    event_bus: EventBus,
}

impl UploadService {
    /// Create a service that publishes without cover images
    ///
    /// `platform` must already be logged in or restored.
    pub fn new(
        platform: Box<dyn Platform>,
        source: Box<dyn MediaSource>,
        ledger: HistoryLedger,
        options: UploadOptions,
    ) -> Self {
        Self {
            platform,
            source,
            extractor: None,
            ledger,
            options,
            event_bus: EventBus::default(),
        }
    }

    /// Derive a cover frame for every upload
    pub fn with_frame_extractor(mut self, extractor: Box<dyn FrameExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> HistoryLedger {
        self.ledger
    }

    /// Process the manifest until it is exhausted or the cap is reached
    ///
    /// # Errors
    ///
    /// Only history persistence failures are returned; per-entry failures
    /// are logged and counted in the summary.
    pub async fn run(&mut self, manifest: &Manifest) -> Result<RunSummary> {
        let cap = self.options.cap;
        let mut summary = RunSummary::default();

        info!(
            "Processing {} manifest entries (upload cap {})",
            manifest.len(),
            cap
        );
        self.event_bus.emit(Event::RunStarted {
            entries: manifest.len(),
            cap,
        });

        for (key, entry) in manifest.iter() {
            if summary.published >= cap {
                info!("Upload cap of {} reached, stopping", cap);
                summary.cap_reached = true;
                self.event_bus.emit(Event::CapReached { cap });
                break;
            }

            if self.ledger.has(key) {
                info!(key = %key, "Skipping, already uploaded");
                summary.skipped += 1;
                self.event_bus.emit(Event::ItemSkipped {
                    key: key.to_string(),
                });
                continue;
            }

            let Some(video_url) = entry.video_url() else {
                info!(key = %key, "No media available, nothing to upload");
                summary.unavailable += 1;
                self.event_bus.emit(Event::ItemUnavailable {
                    key: key.to_string(),
                });
                continue;
            };
            let caption = entry.caption();

            let scratch = match ScratchFiles::acquire(&self.options.scratch_dir).await {
                Ok(scratch) => scratch,
                Err(e) => {
                    error!(key = %key, "Cannot prepare scratch files: {}", e);
                    summary.failed += 1;
                    self.event_bus.emit(Event::ItemFailed {
                        key: key.to_string(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            // Release happens before any error leaves this iteration
            let committed = match self.upload_entry(key, video_url, caption, &scratch).await {
                Ok(result) => self.commit(key, result, caption, video_url).await,
                Err(e) => {
                    error!(key = %key, "Upload failed: {}", e);
                    summary.failed += 1;
                    self.event_bus.emit(Event::ItemFailed {
                        key: key.to_string(),
                        error: e.to_string(),
                    });
                    Ok(false)
                }
            };

            scratch.release().await;
            self.event_bus.emit(Event::ItemCleanedUp {
                key: key.to_string(),
            });

            if committed? {
                summary.published += 1;
            }
        }

        info!(
            "Run finished: {} published, {} skipped, {} without media, {} failed",
            summary.published, summary.skipped, summary.unavailable, summary.failed
        );
        self.event_bus.emit(Event::RunCompleted {
            published: summary.published,
        });

        Ok(summary)
    }

    /// Fetch, derive and publish one entry
    async fn upload_entry(
        &self,
        key: &str,
        video_url: &str,
        caption: &str,
        scratch: &ScratchFiles,
    ) -> Result<PublishResult> {
        debug!(key = %key, "Fetching {}", video_url);
        self.event_bus.emit(Event::ItemFetching {
            key: key.to_string(),
            url: video_url.to_string(),
        });
        self.source.fetch(video_url, scratch.video()).await?;

        let cover = match &self.extractor {
            Some(extractor) => {
                self.event_bus.emit(Event::ItemDeriving {
                    key: key.to_string(),
                });
                extractor
                    .extract_frame(scratch.video(), scratch.thumbnail(), self.options.thumbnail)
                    .await?;
                Some(scratch.thumbnail())
            }
            None => None,
        };

        info!(key = %key, "Publishing to {}", self.platform.name());
        self.event_bus.emit(Event::ItemPublishing {
            key: key.to_string(),
        });
        publisher::publish_files(self.platform.as_ref(), scratch.video(), caption, cover).await
    }

    /// Record a successful publish and write the ledger through
    ///
    /// The in-memory record is added before saving, so a failed save still
    /// keeps the entry from being published again within this process.
    async fn commit(
        &mut self,
        key: &str,
        result: PublishResult,
        caption: &str,
        video_url: &str,
    ) -> Result<bool> {
        self.ledger
            .record(key, HistoryRecord::now(result, caption, video_url));
        self.ledger.save().await?;

        info!(key = %key, "Uploaded and recorded");
        self.event_bus.emit(Event::ItemRecorded {
            key: key.to_string(),
        });
        Ok(true)
    }
}
