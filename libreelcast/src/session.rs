//! Session persistence and the restore-or-login lifecycle
//!
//! The serialized session is written immediately after a fresh login so
//! later runs skip authentication. Expiry is not tracked here; the remote
//! service decides whether a stored session still works.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::{Result, SessionError};
use crate::persist::write_atomic;
use crate::platforms::Platform;
use crate::types::SessionState;

/// Stable device identity derived from a seed string
///
/// The same seed always yields the same identity, so the remote service sees
/// one consistent device across logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub phone_id: String,
}

impl DeviceIdentity {
    pub fn from_seed(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());

        let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();

        let mut uuid_bytes = [0u8; 16];
        uuid_bytes.copy_from_slice(&digest[16..32]);
        let phone_id = uuid::Builder::from_random_bytes(uuid_bytes)
            .into_uuid()
            .to_string();

        Self {
            device_id: format!("android-{}", hex),
            phone_id,
        }
    }
}

/// How the session for this run was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Restored,
    LoggedIn,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session, if any
    ///
    /// An unreadable or malformed file is treated as absent: the caller logs
    /// in again and the file is overwritten.
    pub async fn load(&self) -> Option<SessionState> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Cannot read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(SessionState::new(value)),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed session file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub async fn save(&self, state: &SessionState) -> Result<()> {
        let content = serde_json::to_vec_pretty(state).map_err(SessionError::from)?;
        write_atomic(&self.path, &content)
            .await
            .map_err(|source| SessionError::Persistence {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }
}

/// Resume the stored session or log in and persist a new one
///
/// # Errors
///
/// `PlatformError::Authentication` when login fails, which is fatal to the
/// run. A stored session the platform refuses falls back to a fresh login.
pub async fn restore_or_authenticate(
    store: &SessionStore,
    platform: &mut dyn Platform,
    device: &DeviceIdentity,
    credentials: &Credentials,
) -> Result<SessionOrigin> {
    if let Some(state) = store.load().await {
        match platform.restore_session(&state).await {
            Ok(()) => {
                tracing::info!("Restored session from {}", store.path().display());
                return Ok(SessionOrigin::Restored);
            }
            Err(e) => {
                tracing::warn!("Stored session rejected, logging in again: {}", e);
            }
        }
    }

    tracing::info!("Logging in as {}", credentials.username);
    let state = platform.login(credentials, device).await?;
    store.save(&state).await?;
    tracing::debug!("Saved session to {}", store.path().display());

    Ok(SessionOrigin::LoggedIn)
}
