//! Service layer for reelcast
//!
//! `UploadService` drives one run of the pipeline over a manifest and
//! reports progress on an [`events::EventBus`]. Sessions are established
//! before the service is built; see [`crate::session`].
//!
//! # Example
//!
//! ```no_run
//! use libreelcast::history::HistoryLedger;
//! use libreelcast::manifest::Manifest;
//! use libreelcast::media::HttpMediaSource;
//! use libreelcast::platforms::mock::MockPlatform;
//! use libreelcast::service::{UploadOptions, UploadService};
//! use libreelcast::Config;
//!
//! # async fn example() -> libreelcast::Result<()> {
//! let config = Config::load()?;
//! let manifest = Manifest::load(&config.paths.manifest_path()).await?;
//! let ledger = HistoryLedger::load(&config.paths.history_path()).await?;
//!
//! let mut service = UploadService::new(
//!     Box::new(MockPlatform::success().authenticated()),
//!     Box::new(HttpMediaSource::default()),
//!     ledger,
//!     UploadOptions::from_config(&config),
//! );
//!
//! let summary = service.run(&manifest).await?;
//! println!("Uploaded {} video(s)", summary.published);
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod upload;

pub use events::{Event, EventBus, EventReceiver};
pub use upload::{RunSummary, UploadOptions, UploadService};
