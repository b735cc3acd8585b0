//! Account credentials supplied through the environment
//!
//! The password is held in a [`SecretString`] so it is zeroed on drop and
//! never shows up in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, StartupError};

pub const USERNAME_VAR: &str = "REELCAST_USERNAME";
pub const PASSWORD_VAR: &str = "REELCAST_PASSWORD";
pub const DEVICE_SEED_VAR: &str = "REELCAST_DEVICE_SEED";

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    password: SecretString,
    device_seed: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            device_seed: None,
        }
    }

    /// Read credentials from `REELCAST_USERNAME` / `REELCAST_PASSWORD`
    ///
    /// Empty values count as missing.
    pub fn from_env() -> Result<Self> {
        let username = required_var(USERNAME_VAR)?;
        let password = required_var(PASSWORD_VAR)?;
        let device_seed = std::env::var(DEVICE_SEED_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            username,
            password: SecretString::from(password),
            device_seed,
        })
    }

    pub fn with_device_seed(mut self, seed: impl Into<String>) -> Self {
        self.device_seed = Some(seed.into());
        self
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Seed for the device identity, defaulting to the account name
    pub fn device_seed(&self) -> &str {
        self.device_seed.as_deref().unwrap_or(&self.username)
    }
}

fn required_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StartupError::MissingCredential(name.to_string()).into()),
    }
}
