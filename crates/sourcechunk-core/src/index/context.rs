//! Context headers for embedding text
//!
//! Every chunk's `enriched_text` is a short metadata header, a blank line,
//! and the raw source. Header lines appear in a fixed order and are skipped
//! when their field is empty:
//!
//! ```text
//! Parent: Greeter (class_definition)
//! File: src/greet.py
//! Language: python
//! Type: function_definition
//! Symbol: hello
//! Lines: 2-3
//! ```

use super::chunker::Chunk;

const UNKNOWN_PARENT_KIND: &str = "unknown";

/// Metadata header for a chunk, or an empty string when nothing is known
pub fn build_context(chunk: &Chunk) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(6);

    if chunk.parent_id.is_some() {
        if let Some(parent_name) = chunk.parent_name.as_deref().filter(|n| !n.is_empty()) {
            let parent_kind = chunk
                .parent_kind
                .as_deref()
                .filter(|k| !k.is_empty())
                .unwrap_or(UNKNOWN_PARENT_KIND);
            parts.push(format!("Parent: {} ({})", parent_name, parent_kind));
        }
    }

    if !chunk.file_path.is_empty() {
        parts.push(format!("File: {}", chunk.file_path));
    }
    if !chunk.language.is_empty() {
        parts.push(format!("Language: {}", chunk.language));
    }
    if !chunk.kind.is_empty() {
        parts.push(format!("Type: {}", chunk.kind));
    }
    if !chunk.name.is_empty() {
        parts.push(format!("Symbol: {}", chunk.name));
    }
    if chunk.start_line > 0 {
        parts.push(format!("Lines: {}-{}", chunk.start_line, chunk.end_line));
    }

    parts.join("\n")
}

/// Join a header and raw text; an empty header leaves the text untouched
pub fn build_enriched_text(context: &str, raw_text: &str) -> String {
    if context.is_empty() {
        raw_text.to_string()
    } else {
        format!("{}\n\n{}", context, raw_text)
    }
}

/// Enriched text for a chunk from its own metadata
pub fn enriched_text(chunk: &Chunk) -> String {
    build_enriched_text(&build_context(chunk), &chunk.raw_text)
}

/// Set `enriched_text` in place
pub fn enrich(chunk: &mut Chunk) {
    chunk.enriched_text = enriched_text(chunk);
}
