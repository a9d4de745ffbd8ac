//! Inspect command

use crate::app::{InspectArgs, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use sourcechunk_core::{load_chunks, Chunk};
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize)]
struct StoreSummary {
    repository: Option<String>,
    version: Option<String>,
    legacy: bool,
    chunks: usize,
    files: usize,
    parents: usize,
    embeddable: usize,
    split_chunks: usize,
    /// Chunks whose text occurs at more than one location
    deduplicated: usize,
    by_language: BTreeMap<String, usize>,
    by_kind: BTreeMap<String, usize>,
}

fn summarize(chunks: &[Chunk]) -> StoreSummary {
    let mut summary = StoreSummary {
        chunks: chunks.len(),
        ..Default::default()
    };
    let mut files = std::collections::BTreeSet::new();

    for chunk in chunks {
        files.insert(chunk.file_path.as_str());
        if chunk.is_parent {
            summary.parents += 1;
        } else {
            summary.embeddable += 1;
        }
        if chunk.is_split() {
            summary.split_chunks += 1;
        }
        if chunk.locations.len() > 1 {
            summary.deduplicated += 1;
        }
        *summary.by_language.entry(chunk.language.clone()).or_default() += 1;
        *summary.by_kind.entry(chunk.kind.clone()).or_default() += 1;
    }

    summary.files = files.len();
    summary
}

pub async fn run(args: InspectArgs, format: OutputFormat) -> Result<()> {
    let loaded = load_chunks(&args.file)?;

    let mut summary = summarize(&loaded.chunks);
    summary.legacy = loaded.is_legacy();
    summary.repository = loaded.repository.clone();
    summary.version = loaded.version.clone();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": summary,
                "statistics": loaded.statistics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            println!(
                "Repository:      {}",
                summary.repository.as_deref().unwrap_or("-")
            );
            match &summary.version {
                Some(v) => println!("Format:          {}", v),
                None => println!("Format:          legacy array"),
            }
            println!();
            println!("Chunks:          {}", summary.chunks);
            println!("  Files:         {}", summary.files);
            println!("  Parents:       {}", summary.parents);
            println!("  Embeddable:    {}", summary.embeddable);
            println!("  Split:         {}", summary.split_chunks);
            println!("  Deduplicated:  {}", summary.deduplicated);

            println!();
            println!("By language:");
            for (language, count) in &summary.by_language {
                println!("  {:<14} {}", language, count);
            }
            println!();
            println!("By kind:");
            for (kind, count) in &summary.by_kind {
                println!("  {:<24} {}", kind, count);
            }

            if let Some(stats) = &loaded.statistics {
                println!();
                println!("Last run:");
                println!("  Processed:     {}", stats.files_processed);
                println!("  Fallback:      {}", stats.fallback_files);
                println!("  Failures:      {}", stats.failures.len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcechunk_core::{SemanticUnit, UnitId};

    fn chunk(path: &str, kind: &str, is_container: bool) -> Chunk {
        Chunk::from_unit(&SemanticUnit {
            id: UnitId::new(),
            kind: kind.to_string(),
            name: "x".to_string(),
            raw_text: format!("{} in {}", kind, path),
            file_path: path.to_string(),
            language: "python".to_string(),
            start_line: 1,
            end_line: 1,
            start_offset: 0,
            end_offset: 1,
            is_container,
            parent_id: None,
            child_ids: Vec::new(),
            cell: None,
        })
    }

    #[test]
    fn test_summarize_counts() {
        let mut dup = chunk("a.py", "function_definition", false);
        dup.locations.push("b.py:1-1".to_string());
        let chunks = vec![
            chunk("a.py", "class_definition", true),
            dup,
            chunk("c.py", "function_definition", false),
        ];

        let summary = summarize(&chunks);
        assert_eq!(summary.chunks, 3);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.parents, 1);
        assert_eq!(summary.embeddable, 2);
        assert_eq!(summary.deduplicated, 1);
        assert_eq!(summary.by_kind["function_definition"], 2);
        assert_eq!(summary.by_language["python"], 3);
    }
}
