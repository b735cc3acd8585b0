//! Mock platform implementation for testing
//!
//! A configurable in-memory platform that can simulate login, restore and
//! publish outcomes. Call counters and published uploads live behind `Arc`s,
//! so a clone taken before handing the platform to a service still observes
//! everything the service does.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use crate::credentials::Credentials;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::session::DeviceIdentity;
use crate::types::{PublishResult, SessionState, VideoUpload};

/// Configuration for mock platform behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub name: String,

    pub login_succeeds: bool,

    /// Whether a stored session is accepted by `restore_session`
    pub restore_succeeds: bool,

    pub publish_succeeds: bool,

    /// Fail only publishes whose caption matches
    pub fail_caption: Option<String>,

    pub login_error: Option<String>,

    pub publish_error: Option<String>,

    pub login_call_count: Arc<Mutex<usize>>,

    pub restore_call_count: Arc<Mutex<usize>>,

    pub publish_call_count: Arc<Mutex<usize>>,

    /// Uploads accepted so far (for verification)
    pub published: Arc<Mutex<Vec<VideoUpload>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            login_succeeds: true,
            restore_succeeds: true,
            publish_succeeds: true,
            fail_caption: None,
            login_error: None,
            publish_error: None,
            login_call_count: Arc::new(Mutex::new(0)),
            restore_call_count: Arc::new(Mutex::new(0)),
            publish_call_count: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock platform for testing
#[derive(Debug, Clone)]
pub struct MockPlatform {
    config: MockConfig,
    authenticated: bool,
}

impl MockPlatform {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            authenticated: false,
        }
    }

    /// A mock platform where everything succeeds
    pub fn success() -> Self {
        Self::new(MockConfig::default())
    }

    /// A mock platform that rejects logins
    pub fn login_failure(error: &str) -> Self {
        Self::new(MockConfig {
            login_succeeds: false,
            login_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// A mock platform that rejects stored sessions
    pub fn stale_session() -> Self {
        Self::new(MockConfig {
            restore_succeeds: false,
            ..Default::default()
        })
    }

    /// A mock platform whose publishes always fail
    pub fn publish_failure(error: &str) -> Self {
        Self::new(MockConfig {
            publish_succeeds: false,
            publish_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// A mock platform that fails publishes with the given caption
    pub fn failing_caption(caption: &str) -> Self {
        Self::new(MockConfig {
            fail_caption: Some(caption.to_string()),
            ..Default::default()
        })
    }

    /// Start out already logged in
    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn login_call_count(&self) -> usize {
        *self.config.login_call_count.lock().unwrap()
    }

    pub fn restore_call_count(&self) -> usize {
        *self.config.restore_call_count.lock().unwrap()
    }

    pub fn publish_call_count(&self) -> usize {
        *self.config.publish_call_count.lock().unwrap()
    }

    /// Captions of every accepted upload, in order
    pub fn published_captions(&self) -> Vec<String> {
        self.config
            .published
            .lock()
            .unwrap()
            .iter()
            .map(|upload| upload.caption.clone())
            .collect()
    }

    pub fn published(&self) -> Vec<VideoUpload> {
        self.config.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn login(
        &mut self,
        credentials: &Credentials,
        device: &DeviceIdentity,
    ) -> Result<SessionState> {
        *self.config.login_call_count.lock().unwrap() += 1;

        if !self.config.login_succeeds {
            let error_msg = self
                .config
                .login_error
                .clone()
                .unwrap_or_else(|| "Mock login failed".to_string());
            return Err(PlatformError::Authentication(error_msg).into());
        }

        self.authenticated = true;
        Ok(SessionState::new(json!({
            "username": credentials.username,
            "device_id": device.device_id,
            "token": format!("mock-token-{}", uuid::Uuid::new_v4()),
        })))
    }

    async fn restore_session(&mut self, state: &SessionState) -> Result<()> {
        *self.config.restore_call_count.lock().unwrap() += 1;

        if !self.config.restore_succeeds || state.as_value().get("token").is_none() {
            return Err(PlatformError::Authentication("Mock session rejected".to_string()).into());
        }

        self.authenticated = true;
        Ok(())
    }

    async fn publish(&self, upload: &VideoUpload) -> Result<PublishResult> {
        *self.config.publish_call_count.lock().unwrap() += 1;

        if !self.authenticated {
            return Err(PlatformError::Authentication("Not authenticated".to_string()).into());
        }

        let caption_fails = self.config.fail_caption.as_deref() == Some(upload.caption.as_str());
        if !self.config.publish_succeeds || caption_fails {
            let error_msg = self
                .config
                .publish_error
                .clone()
                .unwrap_or_else(|| "Mock publishing failed".to_string());
            return Err(PlatformError::Posting(error_msg).into());
        }

        self.config.published.lock().unwrap().push(upload.clone());

        Ok(PublishResult::new(json!({
            "status": "ok",
            "media": {
                "id": format!("{}:mock-{}", self.config.name, uuid::Uuid::new_v4()),
                "caption": upload.caption,
                "has_cover": upload.cover.is_some(),
            }
        })))
    }
}
