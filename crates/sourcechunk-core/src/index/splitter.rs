//! Token-budget splitting of oversized chunks
//!
//! Splits on line boundaries only. Adjacent fragments share a tail of up
//! to `overlap_tokens` tokens so no fragment starts without context.

use super::ast_chunker::{compute_content_hash, format_location, UnitId};
use super::chunker::{Chunk, SplitInfo};
use super::context;
use super::tokenizer::{token_counter_for, TokenCounter};
use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// One line of a chunk's raw text, without its terminator
struct LineSpan<'a> {
    text: &'a str,
    /// Byte offset of the line within the raw text
    offset: usize,
    tokens: usize,
}

/// Greedy line-based splitter
#[derive(Clone)]
pub struct TokenSplitter {
    max_tokens: usize,
    overlap_tokens: usize,
    counter: Arc<dyn TokenCounter>,
}

impl std::fmt::Debug for TokenSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSplitter")
            .field("max_tokens", &self.max_tokens)
            .field("overlap_tokens", &self.overlap_tokens)
            .field("counter", &self.counter.name())
            .finish()
    }
}

impl TokenSplitter {
    /// Requires `0 < max_tokens` and `overlap_tokens < max_tokens`
    pub fn new(
        max_tokens: usize,
        overlap_tokens: usize,
        counter: Arc<dyn TokenCounter>,
    ) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".to_string()));
        }
        if overlap_tokens >= max_tokens {
            return Err(Error::Config(format!(
                "overlap_tokens ({}) must be less than max_tokens ({})",
                overlap_tokens, max_tokens
            )));
        }
        Ok(Self {
            max_tokens,
            overlap_tokens,
            counter,
        })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        let counter = token_counter_for(config.tokenizer)?;
        Self::new(config.max_tokens, config.overlap_tokens, counter)
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }

    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Token count of a chunk's raw text, summed line by line
    pub fn count(&self, text: &str) -> usize {
        line_spans(text, self.counter.as_ref())
            .iter()
            .map(|l| l.tokens)
            .sum()
    }

    /// Split `chunk` if its raw text exceeds the budget
    ///
    /// A chunk within budget comes back as the only element, unchanged.
    /// Otherwise every fragment gets a fresh id, its own line and offset
    /// range, and a [`SplitInfo`] pointing back at the original.
    pub fn split(&self, chunk: &Chunk) -> Result<Vec<Chunk>> {
        chunk.validate()?;

        let lines = line_spans(&chunk.raw_text, self.counter.as_ref());
        let total: usize = lines.iter().map(|l| l.tokens).sum();
        if total <= self.max_tokens {
            return Ok(vec![chunk.clone()]);
        }

        let groups = self.group_lines(&lines);
        debug!(
            location = %chunk.location(),
            tokens = total,
            max_tokens = self.max_tokens,
            splits = groups.len(),
            "Splitting oversized chunk"
        );

        Ok(groups
            .into_iter()
            .enumerate()
            .map(|(index, range)| fragment(chunk, &lines, range, index))
            .collect())
    }

    /// Greedy packing of line indices into overlapping ranges
    fn group_lines(&self, lines: &[LineSpan<'_>]) -> Vec<Range<usize>> {
        let mut groups = Vec::new();
        let mut start = 0;
        let mut tokens = 0;

        for (i, line) in lines.iter().enumerate() {
            if tokens + line.tokens > self.max_tokens && i > start {
                groups.push(start..i);

                // seed never pushes the triggering line over budget
                let budget = self
                    .overlap_tokens
                    .min(self.max_tokens.saturating_sub(line.tokens));
                let mut seed_start = i;
                let mut seed_tokens = 0;
                while seed_start > start {
                    let candidate = lines[seed_start - 1].tokens;
                    if seed_tokens + candidate > budget {
                        break;
                    }
                    seed_start -= 1;
                    seed_tokens += candidate;
                }

                start = seed_start;
                tokens = seed_tokens;
            }
            tokens += line.tokens;
        }

        groups.push(start..lines.len());
        groups
    }
}

fn line_spans<'a>(text: &'a str, counter: &dyn TokenCounter) -> Vec<LineSpan<'a>> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for piece in text.split_inclusive('\n') {
        let line = piece
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(piece);
        spans.push(LineSpan {
            text: line,
            offset,
            tokens: counter.count(line),
        });
        offset += piece.len();
    }
    spans
}

fn fragment(original: &Chunk, lines: &[LineSpan<'_>], range: Range<usize>, index: usize) -> Chunk {
    let first = &lines[range.start];
    let last = &lines[range.end - 1];
    let text_start = first.offset;
    let text_end = last.offset + last.text.len();
    let raw_text = original.raw_text[text_start..text_end].to_string();
    let token_count = lines[range.clone()].iter().map(|l| l.tokens).sum();

    // Replacement characters from a lossy decode change the text length, so
    // text offsets no longer map to source bytes. Keep the whole byte range.
    let (start_offset, end_offset) = if original.byte_len_matches_text() {
        (
            original.start_offset + text_start,
            original.start_offset + text_end,
        )
    } else {
        (original.start_offset, original.end_offset)
    };

    let mut chunk = Chunk {
        id: UnitId::new(),
        content_hash: compute_content_hash(&raw_text),
        raw_text,
        enriched_text: String::new(),
        start_line: original.start_line + range.start,
        end_line: original.start_line + range.end - 1,
        start_offset,
        end_offset,
        locations: Vec::new(),
        split: Some(SplitInfo {
            is_split: true,
            split_index: index,
            original_hash: original.content_hash.clone(),
            original_id: original.id,
            token_count,
        }),
        ..original.clone()
    };

    let mut locations = vec![chunk.location()];
    locations.extend(
        original
            .locations
            .iter()
            .skip(1)
            .map(|loc| shift_location(loc, &range)),
    );
    chunk.locations = locations;
    context::enrich(&mut chunk);
    chunk
}

/// Narrow a duplicate's `path:start-end` location to the fragment's lines
///
/// Duplicates share the original's text, so the same line range applies.
/// Entries that do not parse are kept as they are.
fn shift_location(location: &str, range: &Range<usize>) -> String {
    let parsed = location.rsplit_once(':').and_then(|(path, lines)| {
        let (start, _) = lines.split_once('-')?;
        let start: usize = start.parse().ok()?;
        Some(format_location(
            path,
            start + range.start,
            start + range.end - 1,
        ))
    });
    parsed.unwrap_or_else(|| location.to_string())
}
