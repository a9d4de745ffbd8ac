//! Chunking pipeline
//!
//! Unit extraction, deduplication, context enrichment and token splitting.

pub mod ast_chunker;
mod chunker;
mod collector;
pub mod context;
mod embedder;
mod pipeline;
mod splitter;
pub mod tokenizer;

pub use ast_chunker::{
    compute_content_hash, language_for_path, CellInfo, Extraction, Grammar, GrammarRegistry,
    SemanticUnit, UnitExtractor, UnitId,
};
pub use chunker::*;
pub use collector::*;
pub use embedder::*;
pub use pipeline::*;
pub use splitter::*;
pub use tokenizer::{
    token_counter_for, HeuristicTokenCounter, TiktokenCounter, TokenCounter,
    WhitespaceTokenCounter,
};
