//! HTTP/JSON platform client
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `POST /auth/login` with `{username, password, device_id, phone_id}`;
//!   the JSON response is the session state and must carry a `token`.
//! - `POST /media/reels` as multipart (`caption`, `video`, optional `cover`)
//!   with the token as a bearer credential; the JSON response is the publish
//!   result.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

use crate::credentials::Credentials;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::session::DeviceIdentity;
use crate::types::{PublishResult, SessionState, VideoUpload};

const USER_AGENT: &str = concat!("reelcast/", env!("CARGO_PKG_VERSION"));

pub struct HttpPlatform {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPlatform {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| PlatformError::Authentication("Not logged in".to_string()).into())
    }
}

fn token_from(state: &Value) -> Option<&str> {
    state.get("token").and_then(Value::as_str).filter(|t| !t.is_empty())
}

/// Map a non-success response to a platform error, keeping the body text
async fn status_error(response: Response, context: &str) -> PlatformError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = if body.trim().is_empty() {
        format!("{} returned HTTP {}", context, status.as_u16())
    } else {
        format!("{} returned HTTP {}: {}", context, status.as_u16(), body.trim())
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PlatformError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimit(detail),
        _ => PlatformError::Posting(detail),
    }
}

fn media_part(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .map_err(|e| PlatformError::Validation(format!("Invalid MIME type {}: {}", mime, e)).into())
}

#[async_trait]
impl Platform for HttpPlatform {
    fn name(&self) -> &str {
        "http"
    }

    async fn login(
        &mut self,
        credentials: &Credentials,
        device: &DeviceIdentity,
    ) -> Result<SessionState> {
        tracing::debug!("Logging in as {} via {}", credentials.username, self.base_url);

        let response = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&json!({
                "username": credentials.username,
                "password": credentials.password(),
                "device_id": device.device_id,
                "phone_id": device.phone_id,
            }))
            .send()
            .await
            .map_err(|e| PlatformError::Authentication(format!("Login request failed: {}", e)))?;

        if !response.status().is_success() {
            let error = match status_error(response, "Login").await {
                PlatformError::Authentication(msg) | PlatformError::Posting(msg) => {
                    PlatformError::Authentication(msg)
                }
                other => other,
            };
            return Err(error.into());
        }

        let state: Value = response.json().await.map_err(|e| {
            PlatformError::Authentication(format!("Login response was not JSON: {}", e))
        })?;

        let token = token_from(&state)
            .ok_or_else(|| {
                PlatformError::Authentication("Login response carried no token".to_string())
            })?
            .to_string();

        self.token = Some(token);
        Ok(SessionState::new(state))
    }

    async fn restore_session(&mut self, state: &SessionState) -> Result<()> {
        let token = token_from(state.as_value()).ok_or_else(|| {
            PlatformError::Authentication("Stored session carries no token".to_string())
        })?;
        self.token = Some(token.to_string());
        Ok(())
    }

    async fn publish(&self, upload: &VideoUpload) -> Result<PublishResult> {
        let token = self.token()?;

        let mut form = Form::new()
            .text("caption", upload.caption.clone())
            .part("video", media_part(upload.video.clone(), "video.mp4", "video/mp4")?);
        if let Some(cover) = &upload.cover {
            form = form.part("cover", media_part(cover.clone(), "cover.jpg", "image/jpeg")?);
        }

        let response = self
            .client
            .post(self.endpoint("/media/reels"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PlatformError::Network(format!("Publish request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, "Publish").await.into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlatformError::Network(format!("Failed to read publish response: {}", e)))?;
        let value = serde_json::from_str(&body).unwrap_or(Value::String(body));

        Ok(PublishResult::new(value))
    }
}
