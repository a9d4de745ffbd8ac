//! Chunk records produced by a chunking run

use super::ast_chunker::{compute_content_hash, format_location, CellInfo, SemanticUnit, UnitId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A deduplicated, enriched, possibly split semantic unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: UnitId,
    #[serde(rename = "node_type", alias = "type")]
    pub kind: String,
    #[serde(rename = "node_name", alias = "name")]
    pub name: String,
    /// Exact source text of the unit (or of this fragment)
    #[serde(rename = "content")]
    pub raw_text: String,
    /// Context header followed by a blank line and `raw_text`
    #[serde(alias = "enriched_content", default)]
    pub enriched_text: String,
    #[serde(alias = "hash")]
    pub content_hash: String,
    pub file_path: String,
    pub language: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(rename = "start_byte")]
    pub start_offset: usize,
    #[serde(rename = "end_byte")]
    pub end_offset: usize,

    /// True when the unit is a container of other units
    #[serde(default)]
    pub is_parent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<UnitId>,
    #[serde(
        rename = "parent_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(rename = "children_ids", default, skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<UnitId>,

    /// Every `path:start-end` at which this exact text occurs
    #[serde(default)]
    pub locations: Vec<String>,

    #[serde(flatten)]
    pub split: Option<SplitInfo>,

    /// `cell_index` and `cell_type` for chunks from notebooks
    #[serde(flatten)]
    pub cell: Option<CellInfo>,
}

/// Present only on fragments produced by the token splitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInfo {
    pub is_split: bool,
    /// 0-based position among the fragments of one chunk
    pub split_index: usize,
    pub original_hash: String,
    pub original_id: UnitId,
    pub token_count: usize,
}

impl Chunk {
    /// Chunk for a unit seen for the first time; enrichment is left empty
    pub fn from_unit(unit: &SemanticUnit) -> Self {
        Self {
            id: unit.id,
            kind: unit.kind.clone(),
            name: unit.name.clone(),
            raw_text: unit.raw_text.clone(),
            enriched_text: String::new(),
            content_hash: compute_content_hash(&unit.raw_text),
            file_path: unit.file_path.clone(),
            language: unit.language.clone(),
            start_line: unit.start_line,
            end_line: unit.end_line,
            start_offset: unit.start_offset,
            end_offset: unit.end_offset,
            is_parent: unit.is_container,
            parent_id: unit.parent_id,
            parent_kind: None,
            parent_name: None,
            child_ids: unit.child_ids.clone(),
            locations: vec![unit.location()],
            split: None,
            cell: unit.cell.clone(),
        }
    }

    pub fn location(&self) -> String {
        format_location(&self.file_path, self.start_line, self.end_line)
    }

    /// False when `raw_text` came from a lossy decode and its length no
    /// longer matches the source byte range
    pub fn byte_len_matches_text(&self) -> bool {
        self.end_offset.saturating_sub(self.start_offset) == self.raw_text.len()
    }

    pub fn is_split(&self) -> bool {
        self.split.as_ref().map(|s| s.is_split).unwrap_or(false)
    }

    /// Text handed to embedders; falls back to the raw text before enrichment
    pub fn embedding_text(&self) -> &str {
        if self.enriched_text.is_empty() {
            &self.raw_text
        } else {
            &self.enriched_text
        }
    }

    /// Reject chunks whose positional data cannot be trusted
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(Error::MalformedUnit {
                location: self.location(),
                reason: reason.to_string(),
            })
        };

        if self.file_path.is_empty() {
            return fail("missing file path");
        }
        if self.start_line == 0 {
            return fail("line numbers are 1-indexed");
        }
        if self.end_line < self.start_line {
            return fail("end line before start line");
        }
        if self.end_offset < self.start_offset {
            return fail("end offset before start offset");
        }
        if self.content_hash.is_empty() {
            return fail("missing content hash");
        }
        Ok(())
    }
}
