//! History ledger of published posts
//!
//! A record exists for a key if and only if that manifest entry was
//! successfully published. Records are only ever added; the whole ledger is
//! rewritten after each addition.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};
use crate::persist::write_atomic;
use crate::types::PublishResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub uploaded_at: DateTime<Utc>,
    pub result: PublishResult,
    pub caption: String,
    pub video_url: String,
}

impl HistoryRecord {
    /// A record stamped with the current time
    pub fn now(result: PublishResult, caption: &str, video_url: &str) -> Self {
        Self {
            uploaded_at: Utc::now(),
            result,
            caption: caption.to_string(),
            video_url: video_url.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct HistoryLedger {
    path: PathBuf,
    records: IndexMap<String, HistoryRecord>,
}

impl HistoryLedger {
    /// An empty ledger backed by `path`, without touching the disk
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: IndexMap::new(),
        }
    }

    /// Load the ledger; a missing file is an empty ledger
    ///
    /// # Errors
    ///
    /// `HistoryError::Corrupt` if the file exists but is not a JSON object of
    /// history records. History is never silently dropped.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history at {}, starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(source) => {
                return Err(HistoryError::Read {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };

        let records: IndexMap<String, HistoryRecord> =
            serde_json::from_str(&content).map_err(|source| HistoryError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            "Loaded {} history records from {}",
            records.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Rewrite the ledger file with every record
    pub async fn save(&self) -> Result<()> {
        let content = serde_json::to_vec_pretty(&self.records).map_err(HistoryError::from)?;
        write_atomic(&self.path, &content)
            .await
            .map_err(|source| HistoryError::Persistence {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }

    pub fn has(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&HistoryRecord> {
        self.records.get(key)
    }

    /// Add a record for `key`
    ///
    /// Existing records are never replaced; returns `false` if one was
    /// already present.
    pub fn record(&mut self, key: &str, record: HistoryRecord) -> bool {
        if self.records.contains_key(key) {
            tracing::warn!("History already has a record for {}, keeping it", key);
            return false;
        }
        self.records.insert(key.to_string(), record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
