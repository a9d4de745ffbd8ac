//! Chunk command

use crate::app::{ChunkArgs, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{anyhow, Result};
use sourcechunk_core::{
    save_chunks, ChunkingPipeline, Config, FailureKind, FileSourceSet, RunOptions, SourceSet,
    TokenizerKind,
};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(args: ChunkArgs, config_path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(max) = args.max_tokens {
        config.chunking.max_tokens = max;
    }
    if let Some(overlap) = args.overlap_tokens {
        config.chunking.overlap_tokens = overlap;
    }
    if let Some(name) = &args.tokenizer {
        config.chunking.tokenizer = TokenizerKind::parse(name)
            .ok_or_else(|| anyhow!("unknown tokenizer '{}'", name))?;
    }
    if args.serial {
        config.chunking.parallel = false;
    }
    if let Some(out) = &args.out {
        config.output.chunks_dir = std::env::current_dir()?.join(out);
    }
    config.validate()?;

    let source = FileSourceSet::new(&args.path, &config.source)?;
    let repo_name = args
        .repo_name
        .clone()
        .or_else(|| source.root_name())
        .unwrap_or_else(|| "repository".to_string());
    let store_dir = config.output.repository_dir(source.root(), &repo_name)?;

    let pipeline = ChunkingPipeline::new(config.chunking.clone())?;

    let reporter = Arc::new(ProgressReporter::default());
    let mut options = RunOptions::default();
    if let Some(limit) = args.max_files {
        options = options.with_file_limit(limit);
    }
    if format == OutputFormat::Cli {
        let reporter = reporter.clone();
        options = options.with_progress(move |p| reporter.update(p));
    }

    let chunk_run = tokio::task::spawn_blocking(move || pipeline.run_with(&source, &options))
        .await??;
    if format == OutputFormat::Cli {
        reporter.finish();
    }

    let path = save_chunks(&store_dir, &repo_name, &chunk_run.chunks, &chunk_run.statistics)?;
    let stats = &chunk_run.statistics;

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "repository": repo_name,
                "path": path,
                "statistics": stats,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Cli => {
            println!("Repository:      {}", repo_name);
            println!("Store:           {}", path.display());
            println!();
            println!("Files:");
            println!("  Discovered:    {}", stats.files_discovered);
            println!("  Processed:     {}", stats.files_processed);
            println!("  Fallback:      {}", stats.fallback_files);
            println!("  Unreadable:    {}", stats.files_failed);
            println!("  Skipped:       {}", stats.files_skipped);
            println!();
            println!("Chunks:");
            println!("  Unique units:  {}", stats.unique_chunks);
            println!("  Duplicates:    {}", stats.duplicate_count);
            println!("  Units split:   {}", stats.units_split);
            println!("  Split chunks:  {}", stats.split_chunks_created);
            println!("  Total:         {}", stats.total_chunks);

            let malformed = stats.failures_of(FailureKind::MalformedUnit).count();
            if malformed > 0 {
                println!();
                println!("{} malformed units kept unsplit", malformed);
            }
        }
    }
    Ok(())
}
