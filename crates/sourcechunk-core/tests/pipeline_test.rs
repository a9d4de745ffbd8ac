//! End-to-end chunking runs
//!
//! Covers:
//! 1. Container/child linking and parent context in enriched text
//! 2. Cross-file deduplication with merged locations
//! 3. Fallback chunks for files without a grammar
//! 4. Directory walk, splitting and the JSON store together
//! 5. Notebook cells carried through to stored chunks

use sourcechunk_core::{
    load_chunks, save_chunks, Chunk, ChunkingConfig, ChunkingPipeline, FailureKind,
    FileSourceSet, MemorySourceSet, SourceConfig, TokenizerKind,
};
use std::fs;
use tempfile::TempDir;

const GREETER: &str = r#"class Greeter:
    def hello(self):
        return "hi"

    def bye(self):
        return "bye"
"#;

const SHARED: &str = r#"def shared(a, b):
    total = a + b
    if total > 10:
        return total
    return 0
"#;

fn pipeline(max: usize, overlap: usize) -> ChunkingPipeline {
    ChunkingPipeline::new(
        ChunkingConfig::new(max, overlap).with_tokenizer(TokenizerKind::Whitespace),
    )
    .unwrap()
}

fn by_name<'a>(chunks: &'a [Chunk], name: &str) -> &'a Chunk {
    chunks
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no chunk named {}", name))
}

#[test]
fn test_container_links_children() {
    let mut source = MemorySourceSet::new();
    source.add("greeter.py", "python", GREETER);

    let run = pipeline(200, 20).run(&source).unwrap();
    assert_eq!(run.chunks.len(), 3);

    let class = by_name(&run.chunks, "Greeter");
    let hello = by_name(&run.chunks, "hello");
    let bye = by_name(&run.chunks, "bye");

    assert!(class.is_parent);
    assert_eq!(class.child_ids, vec![hello.id, bye.id]);

    for method in [hello, bye] {
        assert!(!method.is_parent);
        assert_eq!(method.parent_id, Some(class.id));
        assert_eq!(method.parent_name.as_deref(), Some("Greeter"));
        assert!(method
            .enriched_text
            .lines()
            .any(|l| l.starts_with("Parent: Greeter")));
        assert!(method.enriched_text.ends_with(&method.raw_text));
    }

    assert!(run.statistics.failures.is_empty());
    assert_eq!(run.statistics.unique_chunks, 3);
}

#[test]
fn test_duplicate_function_across_files() {
    let mut source = MemorySourceSet::new();
    source.add("a.py", "python", format!("def first():\n    pass\n\n{}", SHARED));
    source.add("b.py", "python", SHARED);

    let run = pipeline(200, 20).run(&source).unwrap();

    let shared: Vec<&Chunk> = run.chunks.iter().filter(|c| c.name == "shared").collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].file_path, "a.py");
    assert_eq!(shared[0].locations, vec!["a.py:4-8", "b.py:1-5"]);

    assert_eq!(run.chunks.len(), 2);
    assert_eq!(run.statistics.duplicate_count, 1);
    assert_eq!(run.statistics.duplicated_hashes, 1);
    assert_eq!(run.statistics.unique_chunks, 2);
}

#[test]
fn test_unsupported_language_falls_back() {
    let mut source = MemorySourceSet::new();
    source.add("a.py", "python", "def ok():\n    return 1\n");
    source.add(
        "report.cbl",
        "cobol",
        "IDENTIFICATION DIVISION.\nPROGRAM-ID. REPORT.\n",
    );

    let run = pipeline(200, 20).run(&source).unwrap();
    assert_eq!(run.statistics.files_processed, 2);
    assert_eq!(run.statistics.fallback_files, 1);

    let fallback: Vec<&Chunk> = run
        .chunks
        .iter()
        .filter(|c| c.file_path == "report.cbl")
        .collect();
    assert_eq!(fallback.len(), 1);
    assert_eq!(fallback[0].kind, "file");
    assert_eq!(fallback[0].start_line, 1);
    assert_eq!(fallback[0].end_line, 2);

    let failures: Vec<_> = run
        .statistics
        .failures_of(FailureKind::ParseUnavailable)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, "report.cbl");

    assert!(run.chunks.iter().any(|c| c.name == "ok"));
}

#[test]
fn test_repository_run_and_store() {
    let repo = TempDir::new().unwrap();
    let root = repo.path();
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    fs::create_dir_all(root.join(".hidden")).unwrap();

    fs::write(root.join("pkg/greeter.py"), GREETER).unwrap();
    fs::write(root.join("pkg/shared.py"), SHARED).unwrap();
    fs::write(root.join("node_modules/dep/index.js"), "function dep() {}\n").unwrap();
    fs::write(root.join(".hidden/secret.py"), "def secret():\n    pass\n").unwrap();

    let long_body: String = (0..40)
        .map(|i| format!("    let v{} = {} + {} + {};\n", i, i, i, i))
        .collect();
    fs::write(
        root.join("pkg/lib.rs"),
        format!("pub fn long() {{\n{}}}\n", long_body),
    )
    .unwrap();

    let source = FileSourceSet::new(root, &SourceConfig::default()).unwrap();
    let run = pipeline(60, 8).run(&source).unwrap();

    assert_eq!(run.statistics.files_discovered, 3);
    assert!(run.chunks.iter().all(|c| !c.file_path.contains("node_modules")));
    assert!(run.chunks.iter().all(|c| c.name != "secret"));

    let splits: Vec<&Chunk> = run.chunks.iter().filter(|c| c.is_split()).collect();
    assert!(splits.len() > 1);
    let original = splits[0].split.as_ref().unwrap().original_hash.clone();
    for (i, split) in splits.iter().enumerate() {
        let info = split.split.as_ref().unwrap();
        assert_eq!(info.split_index, i);
        assert_eq!(info.original_hash, original);
        assert!(info.token_count <= 60);
        assert_eq!(split.file_path, "pkg/lib.rs");
    }
    assert_eq!(run.statistics.units_split, 1);

    let out = TempDir::new().unwrap();
    let dir = out.path().join("demo");
    save_chunks(&dir, "demo", &run.chunks, &run.statistics).unwrap();

    let loaded = load_chunks(&dir).unwrap();
    assert_eq!(loaded.chunks, run.chunks);
    assert_eq!(loaded.statistics.as_ref(), Some(&run.statistics));
    assert_eq!(loaded.repository.as_deref(), Some("demo"));
}

#[test]
fn test_notebook_cells_in_store() {
    let notebook = serde_json::json!({
        "cells": [
            {"cell_type": "markdown", "source": ["# Shapes\n", "Area helpers"]},
            {"cell_type": "code", "source": SHARED}
        ]
    });
    let repo = TempDir::new().unwrap();
    fs::write(repo.path().join("shapes.ipynb"), notebook.to_string()).unwrap();
    fs::write(repo.path().join("shared.py"), SHARED).unwrap();

    let source = FileSourceSet::new(repo.path(), &SourceConfig::default()).unwrap();
    let run = pipeline(200, 20).run(&source).unwrap();
    assert_eq!(run.statistics.files_processed, 2);
    assert_eq!(run.statistics.fallback_files, 0);

    let shared = by_name(&run.chunks, "cell_2:shared");
    assert_eq!(shared.locations, vec!["shapes.ipynb:3-7", "shared.py:1-5"]);
    assert_eq!(shared.name, "cell_2:shared");

    let cell = shared.cell.as_ref().unwrap();
    assert_eq!(cell.cell_index, 1);
    assert_eq!(cell.cell_type, "code");

    let value = serde_json::to_value(shared).unwrap();
    assert_eq!(value["cell_index"], 1);
    assert_eq!(value["cell_type"], "code");

    let out = TempDir::new().unwrap();
    save_chunks(out.path(), "shapes", &run.chunks, &run.statistics).unwrap();
    let loaded = load_chunks(out.path()).unwrap();
    assert_eq!(loaded.chunks, run.chunks);
}
