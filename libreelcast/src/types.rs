//! Core types for Reelcast

use serde::{Deserialize, Serialize};

/// Opaque response of a successful publish, echoed verbatim into history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishResult(pub serde_json::Value);

impl PublishResult {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Opaque serialized session of the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState(pub serde_json::Value);

impl SessionState {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Everything the remote service needs for one reel
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub video: Vec<u8>,
    pub caption: String,
    pub cover: Option<Vec<u8>>,
}
