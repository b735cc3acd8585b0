//! reelcast - republish short videos from a manifest
//!
//! The library reads a manifest of scraped posts, downloads each video,
//! derives a cover frame, publishes it to a short-video platform and keeps
//! a history ledger so nothing is posted twice.

pub mod config;
pub mod credentials;
pub mod error;
pub mod history;
pub mod logging;
pub mod manifest;
pub mod media;
mod persist;
pub mod platforms;
pub mod publisher;
pub mod service;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use credentials::Credentials;
pub use error::{ReelcastError, Result};
pub use history::{HistoryLedger, HistoryRecord};
pub use manifest::{Manifest, ManifestEntry};
pub use session::{restore_or_authenticate, DeviceIdentity, SessionOrigin, SessionStore};
pub use types::{PublishResult, SessionState, VideoUpload};
