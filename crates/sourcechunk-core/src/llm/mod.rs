//! Embedding integration
//!
//! The crate does not ship an embedding model or a vector store. Callers
//! plug theirs in through [`Embedder`] and [`VectorSink`].

mod traits;

pub use traits::*;
