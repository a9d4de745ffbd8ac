//! Persisted chunk store
//!
//! One `chunks.json` per repository:
//!
//! ```json
//! { "chunks": [...], "statistics": {...}, "repository": "name",
//!   "version": "2.0", "total_chunks": 3,
//!   "schema": { "parent_child_enabled": true, "hierarchy_fields": [...] } }
//! ```
//!
//! Loading also accepts the legacy layout whose root is the bare chunk array.

use crate::error::{Error, Result};
use crate::index::{Chunk, RunStatistics};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Format version written by [`save_chunks`]
pub const SCHEMA_VERSION: &str = "2.0";

/// File name inside a repository's chunk directory
pub const CHUNKS_FILE_NAME: &str = "chunks.json";

const HIERARCHY_FIELDS: &[&str] = &[
    "id",
    "parent_id",
    "parent_type",
    "parent_name",
    "children_ids",
    "is_parent",
];

/// Hierarchy description written alongside the chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub parent_child_enabled: bool,
    pub hierarchy_fields: Vec<String>,
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self {
            parent_child_enabled: true,
            hierarchy_fields: HIERARCHY_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Top-level persisted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkDocument {
    pub chunks: Vec<Chunk>,
    #[serde(default)]
    pub statistics: Option<RunStatistics>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub total_chunks: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaInfo>,
}

/// Result of [`load_chunks`]; metadata is absent for legacy files
#[derive(Debug, Clone)]
pub struct LoadedChunks {
    pub chunks: Vec<Chunk>,
    pub statistics: Option<RunStatistics>,
    pub repository: Option<String>,
    pub version: Option<String>,
}

impl LoadedChunks {
    pub fn is_legacy(&self) -> bool {
        self.version.is_none()
    }
}

/// Write `chunks` to `<dir>/chunks.json`, creating `dir` if needed
pub fn save_chunks(
    dir: &Path,
    repository: &str,
    chunks: &[Chunk],
    statistics: &RunStatistics,
) -> Result<PathBuf> {
    if repository.is_empty() {
        return Err(Error::Config("repository name cannot be empty".to_string()));
    }
    std::fs::create_dir_all(dir)?;

    let document = ChunkDocument {
        chunks: chunks.to_vec(),
        statistics: Some(statistics.clone()),
        repository: Some(repository.to_string()),
        version: Some(SCHEMA_VERSION.to_string()),
        total_chunks: chunks.len(),
        schema: Some(SchemaInfo::default()),
    };

    let path = dir.join(CHUNKS_FILE_NAME);
    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(&path, json)?;

    info!(path = %path.display(), chunks = chunks.len(), "Chunks saved");
    Ok(path)
}

/// Read a chunk store from a file, or from `<dir>/chunks.json`
pub fn load_chunks(path: &Path) -> Result<LoadedChunks> {
    let file = if path.is_dir() {
        path.join(CHUNKS_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    if !file.is_file() {
        return Err(Error::StoreNotFound(file.display().to_string()));
    }

    let content = std::fs::read_to_string(&file)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let loaded = if value.is_array() {
        debug!(path = %file.display(), "Loading legacy chunk array");
        LoadedChunks {
            chunks: serde_json::from_value(value)?,
            statistics: None,
            repository: None,
            version: None,
        }
    } else {
        let document: ChunkDocument = serde_json::from_value(value)?;
        LoadedChunks {
            chunks: document.chunks,
            statistics: document.statistics,
            repository: document.repository,
            version: document.version,
        }
    };

    info!(path = %file.display(), chunks = loaded.chunks.len(), "Chunks loaded");
    Ok(loaded)
}
