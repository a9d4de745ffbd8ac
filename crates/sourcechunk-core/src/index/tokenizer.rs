//! Token counting for split budgets
//!
//! The splitter only needs `text -> count`. Any `Fn(&str) -> usize` works,
//! alongside three built-in counters selected by [`TokenizerKind`].

use crate::config::TokenizerKind;
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

lazy_static! {
    static ref CL100K: Option<Arc<CoreBPE>> = tiktoken_rs::cl100k_base().ok().map(Arc::new);
}

/// Counts tokens in a piece of text
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    fn name(&self) -> &'static str;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Whitespace-separated words
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// Roughly four characters per token
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// `cl100k_base` byte-pair encoding
#[derive(Clone)]
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TiktokenCounter {
    pub fn new() -> Result<Self> {
        let bpe = CL100K
            .clone()
            .ok_or_else(|| Error::Config("cl100k_base encoding unavailable".to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &'static str {
        "tiktoken"
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TiktokenCounter(cl100k_base)")
    }
}

/// Build the counter named in configuration
pub fn token_counter_for(kind: TokenizerKind) -> Result<Arc<dyn TokenCounter>> {
    Ok(match kind {
        TokenizerKind::Whitespace => Arc::new(WhitespaceTokenCounter),
        TokenizerKind::Heuristic => Arc::new(HeuristicTokenCounter),
        TokenizerKind::Tiktoken => Arc::new(TiktokenCounter::new()?),
    })
}

/// Token count of `text`, accumulated line by line
pub fn count_lines(counter: &dyn TokenCounter, text: &str) -> usize {
    text.lines().map(|line| counter.count(line)).sum()
}
