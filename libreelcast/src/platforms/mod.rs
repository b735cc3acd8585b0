//! Remote publishing service abstraction
//!
//! The remote service is treated as opaque: it can log in, resume a
//! previously serialized session and publish a video with a caption and an
//! optional cover image. Whatever it returns from a publish is kept verbatim.
//!
//! # Examples
//!
//! ```no_run
//! use libreelcast::credentials::Credentials;
//! use libreelcast::platforms::{http::HttpPlatform, Platform};
//! use libreelcast::session::DeviceIdentity;
//! use libreelcast::types::VideoUpload;
//!
//! # async fn example() -> libreelcast::Result<()> {
//! let mut platform = HttpPlatform::new("https://api.example.com")?;
//! let credentials = Credentials::new("reel_account", "hunter2");
//! let device = DeviceIdentity::from_seed(credentials.device_seed());
//!
//! let _session = platform.login(&credentials, &device).await?;
//! let result = platform
//!     .publish(&VideoUpload {
//!         video: std::fs::read("clip.mp4").unwrap(),
//!         caption: "hello".to_string(),
//!         cover: None,
//!     })
//!     .await?;
//! println!("Published: {:?}", result);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::session::DeviceIdentity;
use crate::types::{PublishResult, SessionState, VideoUpload};

pub mod http;

// Not gated on cfg(test); integration tests link against it
pub mod mock;

/// A remote service that accepts short-form videos
#[async_trait]
pub trait Platform: Send + Sync {
    /// Lowercase identifier used in logs
    fn name(&self) -> &str;

    /// Log in with account credentials
    ///
    /// Returns the serialized session so later runs can skip the login.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` if the service rejects the
    /// credentials.
    async fn login(
        &mut self,
        credentials: &Credentials,
        device: &DeviceIdentity,
    ) -> Result<SessionState>;

    /// Resume a session produced by an earlier [`Platform::login`]
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` if the state cannot be used.
    async fn restore_session(&mut self, state: &SessionState) -> Result<()>;

    /// Publish one video
    ///
    /// Errors from the service are passed through unchanged; there is no
    /// retry at this level.
    async fn publish(&self, upload: &VideoUpload) -> Result<PublishResult>;
}
