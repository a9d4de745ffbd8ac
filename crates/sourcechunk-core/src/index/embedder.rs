//! Embedding of chunk output
//!
//! Container chunks (`is_parent`) are kept for hierarchy navigation but
//! never embedded; every other chunk is embedded through its enriched text.

use super::ast_chunker::UnitId;
use super::chunker::Chunk;
use crate::error::{Error, Result};
use crate::llm::{Embedder, VectorSink};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

/// Embedding progress
#[derive(Debug, Clone)]
pub struct EmbedProgress {
    pub total_chunks: usize,
    pub processed_chunks: usize,
    pub batches_done: usize,
}

/// Embedding statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbedStats {
    pub total_chunks: usize,
    /// Container chunks left out of embedding
    pub skipped_parents: usize,
    pub embedded_chunks: usize,
    pub batches: usize,
}

/// One vector ready for a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk_id: UnitId,
    pub content_hash: String,
    pub file_path: String,
    pub embedding: Vec<f32>,
}

/// Chunks that take part in embedding, in input order
pub fn embeddable_chunks(chunks: &[Chunk]) -> impl Iterator<Item = &Chunk> {
    chunks.iter().filter(|c| !c.is_parent)
}

/// Embed every non-container chunk and hand the vectors to `sink`
pub async fn embed_chunks(
    chunks: &[Chunk],
    embedder: &dyn Embedder,
    sink: &dyn VectorSink,
    batch_size: usize,
    progress: Option<Box<dyn Fn(EmbedProgress) + Send + Sync>>,
) -> Result<EmbedStats> {
    let batch_size = batch_size.max(1);
    let selected: Vec<&Chunk> = embeddable_chunks(chunks).collect();

    let mut stats = EmbedStats {
        total_chunks: chunks.len(),
        skipped_parents: chunks.len() - selected.len(),
        ..Default::default()
    };

    debug!(
        model = %embedder.model_name(),
        dimensions = embedder.dimensions(),
        chunks = selected.len(),
        skipped = stats.skipped_parents,
        "Embedding chunks"
    );

    for batch in selected.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.embedding_text().to_string()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != batch.len() {
            return Err(Error::Embedding(format!(
                "{} returned {} embeddings for {} texts",
                embedder.model_name(),
                embeddings.len(),
                batch.len()
            )));
        }

        let records: Vec<EmbeddedChunk> = batch
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk {
                chunk_id: chunk.id,
                content_hash: chunk.content_hash.clone(),
                file_path: chunk.file_path.clone(),
                embedding,
            })
            .collect();

        sink.insert(&records).await?;
        stats.embedded_chunks += records.len();
        stats.batches += 1;

        if let Some(ref cb) = progress {
            cb(EmbedProgress {
                total_chunks: selected.len(),
                processed_chunks: stats.embedded_chunks,
                batches_done: stats.batches,
            });
        }
    }

    info!(
        embedded = stats.embedded_chunks,
        skipped_parents = stats.skipped_parents,
        batches = stats.batches,
        "Embedding complete"
    );
    Ok(stats)
}
