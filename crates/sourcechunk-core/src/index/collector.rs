//! Content-hash deduplication across a run
//!
//! The collector is the only owner of the deduplication index. It is fed
//! one file's units at a time, in a fixed file order, so the canonical chunk
//! for a hash is always its first occurrence in that order.

use super::ast_chunker::{SemanticUnit, UnitId};
use super::chunker::Chunk;
use super::context;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Counts read after the reduce pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectorStats {
    /// Distinct content hashes seen
    pub unique_hashes: usize,
    /// Hashes that occurred more than once
    pub duplicated_hashes: usize,
    /// Occurrences dropped because their hash was already seen
    pub duplicate_occurrences: usize,
}

/// Single-owner deduplication index
#[derive(Debug, Default)]
pub struct DeduplicatingCollector {
    /// hash -> identity of the canonical chunk
    canonical: HashMap<String, UnitId>,
    /// hash -> locations of every later occurrence, in arrival order
    duplicate_locations: HashMap<String, Vec<String>>,
}

impl DeduplicatingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn one file's units into chunks, dropping already-seen content
    ///
    /// Returned chunks are enriched and in extraction order. Parent names
    /// and kinds are resolved against `units`, which must all come from the
    /// same file.
    pub fn collect(&mut self, units: &[SemanticUnit]) -> Vec<Chunk> {
        let parents: HashMap<UnitId, &SemanticUnit> = units
            .iter()
            .filter(|u| u.is_container)
            .map(|u| (u.id, u))
            .collect();

        let mut emitted = Vec::new();
        for unit in units {
            let mut chunk = Chunk::from_unit(unit);

            if let Some(first) = self.canonical.get(&chunk.content_hash) {
                let location = unit.location();
                debug!(location = %location, canonical = %first, "Duplicate unit");
                self.duplicate_locations
                    .entry(chunk.content_hash)
                    .or_default()
                    .push(location);
                continue;
            }

            if let Some(parent) = unit.parent_id.and_then(|p| parents.get(&p)) {
                chunk.parent_name = Some(parent.name.clone());
                chunk.parent_kind = Some(parent.kind.clone());
            }
            context::enrich(&mut chunk);

            self.canonical.insert(chunk.content_hash.clone(), chunk.id);
            emitted.push(chunk);
        }

        emitted
    }

    /// Append recorded duplicate locations to each canonical chunk
    pub fn merge_duplicate_locations(&self, chunks: &mut [Chunk]) {
        for chunk in chunks.iter_mut() {
            if let Some(extra) = self.duplicate_locations.get(&chunk.content_hash) {
                if self.canonical.get(&chunk.content_hash) == Some(&chunk.id) {
                    chunk.locations.extend(extra.iter().cloned());
                }
            }
        }
    }

    pub fn duplicate_locations(&self) -> &HashMap<String, Vec<String>> {
        &self.duplicate_locations
    }

    pub fn contains(&self, content_hash: &str) -> bool {
        self.canonical.contains_key(content_hash)
    }

    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            unique_hashes: self.canonical.len(),
            duplicated_hashes: self.duplicate_locations.len(),
            duplicate_occurrences: self.duplicate_locations.values().map(Vec::len).sum(),
        }
    }
}
