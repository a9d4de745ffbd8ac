//! Traits for embedding services and vector stores

use crate::error::Result;
use crate::index::EmbeddedChunk;
use async_trait::async_trait;

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for batch of texts, one per input in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Destination for embedded chunks (an external vector store's insert)
#[async_trait]
pub trait VectorSink: Send + Sync {
    async fn insert(&self, records: &[EmbeddedChunk]) -> Result<()>;
}
