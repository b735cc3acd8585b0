//! Configuration management for Reelcast

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Maximum number of videos published in a single run.
pub const DEFAULT_UPLOAD_CAP: usize = 15;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub manifest: String,
    pub history: String,
    pub session: String,
    pub scratch_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: "~/.local/share/reelcast/manifest.json".to_string(),
            history: "~/.local/share/reelcast/history.json".to_string(),
            session: "~/.local/share/reelcast/session.json".to_string(),
            scratch_dir: std::env::temp_dir()
                .join("reelcast")
                .to_string_lossy()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub cap: usize,
    pub thumbnail: bool,
    pub thumbnail_width: u32,
    pub thumbnail_offset_secs: u32,
    pub ffmpeg: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_UPLOAD_CAP,
            thumbnail: true,
            thumbnail_width: 640,
            thumbnail_offset_secs: 1,
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file at the implicit location is not an error; built-in
    /// defaults are used instead.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail much later in the run
    pub fn validate(&self) -> Result<()> {
        if self.upload.thumbnail && self.upload.thumbnail_width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upload.thumbnail_width".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if let Some(url) = &self.platform.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: "platform.base_url".to_string(),
                    reason: format!("'{}' is not an http(s) URL", url),
                }
                .into());
            }
        }
        Ok(())
    }

    /// The platform API base URL, which has no usable default
    pub fn base_url(&self) -> Result<&str> {
        self.platform
            .base_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("platform.base_url".to_string()).into())
    }
}

impl PathsConfig {
    pub fn manifest_path(&self) -> PathBuf {
        expand_path(&self.manifest)
    }

    pub fn history_path(&self) -> PathBuf {
        expand_path(&self.history)
    }

    pub fn session_path(&self) -> PathBuf {
        expand_path(&self.session)
    }

    pub fn scratch_dir_path(&self) -> PathBuf {
        expand_path(&self.scratch_dir)
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("REELCAST_CONFIG") {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("reelcast").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelcastError;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.upload.cap, 15);
        assert!(config.upload.thumbnail);
        assert_eq!(config.upload.thumbnail_width, 640);
        assert_eq!(config.upload.thumbnail_offset_secs, 1);
        assert!(config.platform.base_url.is_none());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[paths]
manifest = "/srv/reels/manifest.json"

[upload]
cap = 3
thumbnail = false

[platform]
base_url = "https://api.example.com"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(
            config.paths.manifest_path(),
            PathBuf::from("/srv/reels/manifest.json")
        );
        assert_eq!(config.paths.history, PathsConfig::default().history);
        assert_eq!(config.upload.cap, 3);
        assert!(!config.upload.thumbnail);
        assert_eq!(config.upload.thumbnail_width, 640);
        assert_eq!(config.base_url().unwrap(), "https://api.example.com");
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[upload\ncap = ").unwrap();

        let result = Config::load_from_path(&path);
        assert!(matches!(
            result,
            Err(ReelcastError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load_from_path(Path::new("/nonexistent/reelcast.toml"));
        assert!(matches!(
            result,
            Err(ReelcastError::Config(ConfigError::ReadError(_)))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let mut config = Config::default();
        config.upload.thumbnail_width = 0;
        assert!(config.validate().is_err());

        // Irrelevant when thumbnails are off
        config.upload.thumbnail = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.platform.base_url = Some("ftp://example.com".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("platform.base_url"));
    }

    #[test]
    fn test_base_url_missing() {
        let config = Config::default();
        let err = config.base_url().unwrap_err();
        assert!(err.to_string().contains("platform.base_url"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/reels/history.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("reels/history.json"));
    }
}
