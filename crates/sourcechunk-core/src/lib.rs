//! Sourcechunk Core Library
//!
//! AST-aware chunking of source repositories for retrieval.
//!
//! # Features
//! - tree-sitter extraction of functions, classes and other semantic units
//! - Parent/child links between container units and their members
//! - Content-hash deduplication with every duplicate location recorded
//! - Context headers prepended to each chunk's embedding text
//! - Token-budget splitting on line boundaries with overlap
//! - JSON chunk store and an embedding contract that skips containers

pub mod config;
pub mod error;
pub mod index;
pub mod llm;
pub mod providers;
pub mod store;

pub use config::{ChunkingConfig, Config, OutputConfig, SourceConfig, TokenizerKind};
pub use error::{Error, Result, SourceChunkError};
pub use index::{
    embed_chunks, embeddable_chunks, CellInfo, Chunk, ChunkingPipeline, ChunkingRun,
    DeduplicatingCollector, EmbeddedChunk, FailureKind, FailureRecord, FileStage,
    GrammarRegistry, PipelineProgress, RunOptions, RunStatistics, SemanticUnit, SplitInfo,
    TokenCounter, TokenSplitter, UnitExtractor, UnitId,
};
pub use llm::{Embedder, VectorSink};
pub use providers::{FileSourceSet, MemorySourceSet, SourceFile, SourceSet};
pub use store::{load_chunks, save_chunks, LoadedChunks};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "sourcechunk";
