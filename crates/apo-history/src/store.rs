//! Persistence collaborator for the search history.
//!
//! The buffer is written back synchronously with every in-memory update;
//! there is no write buffering. Persistence failures are non-fatal by
//! policy — history is a convenience feature, callers log and move on.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// History persistence error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    /// File I/O error.
    #[error("failed to {operation} history file: {path}")]
    Io {
        /// What was being attempted.
        operation: &'static str,
        /// The file involved.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored history could not be decoded.
    #[error("failed to decode stored history")]
    Decode {
        #[source]
        source: toml::de::Error,
    },

    /// History could not be encoded for storage.
    #[error("failed to encode history")]
    Encode {
        #[source]
        source: toml::ser::Error,
    },
}

/// Result type alias for history persistence.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Key-value collaborator the history buffer persists through.
///
/// Keys are stringified sequential integers (`"0"` = oldest entry).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Read the stored mapping, `None` when nothing was ever stored.
    async fn load(&self) -> Result<Option<BTreeMap<String, String>>>;

    /// Replace the stored mapping.
    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()>;
}

/// TOML-file implementation of [`HistoryStore`].
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store backed by the default per-user data file.
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Get the default history file path.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "Apotheca", "Apotheca")
            .map(|dirs| dirs.data_dir().join("search_history.toml"))
            .unwrap_or_else(|| PathBuf::from("search_history.toml"))
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Option<BTreeMap<String, String>>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored history");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| HistoryError::Io {
            operation: "read",
            path: self.path.clone(),
            source,
        })?;

        let entries =
            toml::from_str(&content).map_err(|source| HistoryError::Decode { source })?;
        Ok(Some(entries))
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                operation: "create directory for",
                path: self.path.clone(),
                source,
            })?;
        }

        let content =
            toml::to_string_pretty(entries).map_err(|source| HistoryError::Encode { source })?;

        std::fs::write(&self.path, content).map_err(|source| HistoryError::Io {
            operation: "write",
            path: self.path.clone(),
            source,
        })
    }
}
