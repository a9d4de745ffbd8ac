//! Core types for AST-aware unit extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind given to the single unit produced when a file cannot be parsed
pub const FALLBACK_KIND: &str = "file";

/// Opaque, process-unique identity of a unit or chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(Uuid);

impl UnitId {
    /// Fresh random identity; never reused across runs
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A syntax node judged worth retrieving on its own, before deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticUnit {
    pub id: UnitId,
    /// Syntax node kind, or [`FALLBACK_KIND`]
    pub kind: String,
    /// Declared symbol name or a synthesized `<kind>_line_<n>` placeholder
    pub name: String,
    pub raw_text: String,
    pub file_path: String,
    pub language: String,
    /// 1-indexed
    pub start_line: usize,
    /// 1-indexed, inclusive
    pub end_line: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub is_container: bool,
    /// Nearest enclosing container in the same file
    pub parent_id: Option<UnitId>,
    /// Units whose `parent_id` is this unit; filled after traversal
    pub child_ids: Vec<UnitId>,
    /// Set for units taken from a notebook cell
    pub cell: Option<CellInfo>,
}

/// Where a notebook unit came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellInfo {
    /// 0-based, counting every cell in the notebook
    pub cell_index: usize,
    /// `code`, `markdown` or `raw`
    pub cell_type: String,
}

impl SemanticUnit {
    /// `path:start-end` string used in chunk locations
    pub fn location(&self) -> String {
        format_location(&self.file_path, self.start_line, self.end_line)
    }
}

pub fn format_location(path: &str, start_line: usize, end_line: usize) -> String {
    format!("{}:{}-{}", path, start_line, end_line)
}

/// blake3 hash of a unit's raw text, used as the deduplication key
pub fn compute_content_hash(text: &str) -> String {
    let hash = blake3::hash(text.as_bytes());
    hash.to_hex()[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_stability() {
        let hash1 = compute_content_hash("fn foo() {}");
        let hash2 = compute_content_hash("fn foo() {}");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_content_hash_whitespace_matters() {
        assert_ne!(
            compute_content_hash("fn foo() {}"),
            compute_content_hash("fn foo()  {}")
        );
    }

    #[test]
    fn test_content_hash_length() {
        assert_eq!(compute_content_hash("test").len(), 32);
    }

    #[test]
    fn test_unit_ids_are_unique() {
        let a = UnitId::new();
        let b = UnitId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_id_serializes_as_string() {
        let id = UnitId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_format_location() {
        assert_eq!(format_location("src/a.py", 3, 9), "src/a.py:3-9");
    }
}
