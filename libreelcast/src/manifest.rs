//! Manifest of candidate posts
//!
//! The manifest is a JSON object keyed by post identifier. Entries are
//! processed in document order, which `IndexMap` preserves.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StartupError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Availability flag: zero or less means the scrape found nothing
    #[serde(default)]
    pub results_number: i64,
    /// Candidate media URLs; only the first is used
    #[serde(default)]
    pub url_list: Vec<String>,
    #[serde(default)]
    pub post_info: Option<PostInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostInfo {
    #[serde(default)]
    pub caption: Option<String>,
}

impl ManifestEntry {
    /// The video to publish, if the entry has any media
    pub fn video_url(&self) -> Option<&str> {
        if self.results_number <= 0 {
            return None;
        }
        self.url_list.first().map(String::as_str)
    }

    pub fn caption(&self) -> &str {
        self.post_info
            .as_ref()
            .and_then(|info| info.caption.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, ManifestEntry>,
}

impl Manifest {
    /// Read the manifest; its absence is fatal to the run
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StartupError::ManifestNotFound(path.to_path_buf()).into());
            }
            Err(source) => {
                return Err(StartupError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };

        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| StartupError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            "Loaded manifest with {} entries from {}",
            manifest.len(),
            path.display()
        );
        Ok(manifest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ManifestEntry)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, ManifestEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelcastError;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "https://site/p/zeta": {
            "results_number": 1,
            "url_list": ["http://cdn/zeta.mp4", "http://cdn/zeta-alt.mp4"],
            "post_info": { "caption": "last letter" }
        },
        "https://site/p/alpha": {
            "results_number": 1,
            "url_list": ["http://cdn/alpha.mp4"],
            "post_info": {}
        },
        "https://site/p/empty": {
            "results_number": 0,
            "url_list": []
        }
    }"#;

    #[test]
    fn test_document_order_is_preserved() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "https://site/p/zeta",
                "https://site/p/alpha",
                "https://site/p/empty"
            ]
        );
    }

    #[test]
    fn test_video_url_uses_first_entry() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let entry = manifest.get("https://site/p/zeta").unwrap();
        assert_eq!(entry.video_url(), Some("http://cdn/zeta.mp4"));
        assert_eq!(entry.caption(), "last letter");
    }

    #[test]
    fn test_missing_caption_defaults_to_empty() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.get("https://site/p/alpha").unwrap().caption(), "");

        let bare = ManifestEntry::default();
        assert_eq!(bare.caption(), "");
    }

    #[test]
    fn test_no_media_when_results_number_zero() {
        let entry = ManifestEntry {
            results_number: 0,
            url_list: vec!["http://cdn/v.mp4".to_string()],
            post_info: None,
        };
        assert_eq!(entry.video_url(), None);
    }

    #[test]
    fn test_no_media_when_url_list_empty() {
        let entry = ManifestEntry {
            results_number: 3,
            url_list: vec![],
            post_info: None,
        };
        assert_eq!(entry.video_url(), None);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Manifest::load(&temp_dir.path().join("manifest.json")).await;
        assert!(matches!(
            result,
            Err(ReelcastError::Startup(StartupError::ManifestNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let result = Manifest::load(&path).await;
        assert!(matches!(
            result,
            Err(ReelcastError::Startup(StartupError::ManifestParse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let manifest = Manifest::load(&path).await.unwrap();
        assert_eq!(manifest.len(), 3);
        assert!(!manifest.is_empty());
    }
}
