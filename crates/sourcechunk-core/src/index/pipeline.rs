//! Chunking pipeline
//!
//! Drives every file of a [`SourceSet`] through
//! `pending -> parsing -> extracting -> collecting -> splitting -> done`.
//! Extraction runs in parallel on the rayon pool, one batch of files at a
//! time. Collection is a single-threaded reduce in file order, so the output
//! is identical whether or not extraction ran in parallel. Splitting is
//! stateless per chunk and runs in parallel with order preserved.
//!
//! Only invalid configuration or an invalid root aborts a run. Per-file and
//! per-chunk problems are recorded in [`RunStatistics`].

use super::ast_chunker::{Extraction, GrammarRegistry, UnitExtractor};
use super::chunker::Chunk;
use super::collector::DeduplicatingCollector;
use super::splitter::TokenSplitter;
use super::tokenizer::TokenCounter;
use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::providers::{SourceFile, SourceSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of one file within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    Pending,
    Parsing,
    Extracting,
    Collecting,
    Splitting,
    Done,
    Failed,
}

impl FileStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStage::Pending => "pending",
            FileStage::Parsing => "parsing",
            FileStage::Extracting => "extracting",
            FileStage::Collecting => "collecting",
            FileStage::Splitting => "splitting",
            FileStage::Done => "done",
            FileStage::Failed => "failed",
        }
    }
}

/// Recoverable problem categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Fallback unit used; the file still produced a chunk
    ParseUnavailable,
    /// File excluded from the run
    FileAccess,
    /// Chunk kept unsplit
    MalformedUnit,
}

/// One entry of the per-failure log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub path: String,
    pub kind: FailureKind,
    pub stage: FileStage,
    pub reason: String,
}

/// Counts and failure log for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunStatistics {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    /// Files never started because of a file limit or deadline
    pub files_skipped: usize,
    /// Files reduced to one file-level unit because parsing was unavailable
    pub fallback_files: usize,
    pub unique_chunks: usize,
    /// Unit occurrences dropped as duplicates
    pub duplicate_count: usize,
    pub duplicated_hashes: usize,
    /// Fragments produced by splitting
    pub split_chunks_created: usize,
    /// Chunks that were replaced by fragments
    pub units_split: usize,
    pub total_chunks: usize,
    pub failures: Vec<FailureRecord>,
}

impl RunStatistics {
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &FailureRecord> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }
}

/// Output of a run
#[derive(Debug, Clone, Default)]
pub struct ChunkingRun {
    pub chunks: Vec<Chunk>,
    pub statistics: RunStatistics,
}

/// Progress event, emitted once per file after it has been collected
#[derive(Debug, Clone, Copy)]
pub struct PipelineProgress<'a> {
    /// Files finished so far, including this one
    pub completed: usize,
    /// Files that will be attempted in this run
    pub total: usize,
    pub path: &'a str,
    pub stage: FileStage,
}

pub type ProgressCallback = Arc<dyn Fn(&PipelineProgress<'_>) + Send + Sync>;

/// Per-run cutoffs and hooks
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Stop starting new files after this many
    pub file_limit: Option<usize>,
    /// Stop starting new batches after this instant
    pub deadline: Option<Instant>,
    pub progress: Option<ProgressCallback>,
}

impl RunOptions {
    pub fn with_file_limit(mut self, limit: usize) -> Self {
        self.file_limit = Some(limit);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PipelineProgress<'_>) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }
}

/// Result of reading and extracting one file
enum FileOutcome {
    Extracted(Extraction),
    Failed(FailureRecord),
}

/// Source set in, deduplicated and budgeted chunks out
#[derive(Debug, Clone)]
pub struct ChunkingPipeline {
    config: ChunkingConfig,
    extractor: UnitExtractor,
    splitter: TokenSplitter,
}

impl ChunkingPipeline {
    /// Validates the configuration; this is the only fatal step
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        let splitter = TokenSplitter::from_config(&config)?;
        Ok(Self {
            config,
            extractor: UnitExtractor::default(),
            splitter,
        })
    }

    pub fn with_registry(mut self, registry: Arc<GrammarRegistry>) -> Self {
        self.extractor = UnitExtractor::new(registry);
        self
    }

    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Result<Self> {
        self.splitter = TokenSplitter::new(
            self.config.max_tokens,
            self.config.overlap_tokens,
            counter,
        )?;
        Ok(self)
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn registry(&self) -> &GrammarRegistry {
        self.extractor.registry()
    }

    pub fn run(&self, source: &dyn SourceSet) -> Result<ChunkingRun> {
        self.run_with(source, &RunOptions::default())
    }

    pub fn run_with(&self, source: &dyn SourceSet, options: &RunOptions) -> Result<ChunkingRun> {
        let started = Instant::now();
        let mut files = source.list_files()?;
        files.sort();

        let mut stats = RunStatistics {
            files_discovered: files.len(),
            ..RunStatistics::default()
        };

        if let Some(limit) = options.file_limit {
            if files.len() > limit {
                stats.files_skipped = files.len() - limit;
                files.truncate(limit);
            }
        }

        let total = files.len();
        let batch_size = (rayon::current_num_threads() * 4).max(1);
        let mut collector = DeduplicatingCollector::new();
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut completed = 0;

        for batch in files.chunks(batch_size) {
            if options.deadline.is_some_and(|d| Instant::now() >= d) {
                let remaining = total - completed;
                warn!(remaining, "Deadline reached, skipping remaining files");
                stats.files_skipped += remaining;
                break;
            }

            let outcomes = self.extract_batch(source, batch);

            for (file, outcome) in batch.iter().zip(outcomes) {
                completed += 1;
                let stage = match outcome {
                    FileOutcome::Failed(record) => {
                        stats.files_failed += 1;
                        stats.failures.push(record);
                        FileStage::Failed
                    }
                    FileOutcome::Extracted(extraction) => {
                        if let Some(reason) = extraction.fallback {
                            stats.fallback_files += 1;
                            stats.failures.push(FailureRecord {
                                path: file.path.clone(),
                                kind: FailureKind::ParseUnavailable,
                                stage: FileStage::Parsing,
                                reason,
                            });
                        }
                        chunks.extend(collector.collect(&extraction.units));
                        stats.files_processed += 1;
                        FileStage::Done
                    }
                };

                if let Some(progress) = &options.progress {
                    progress(&PipelineProgress {
                        completed,
                        total,
                        path: &file.path,
                        stage,
                    });
                }
            }
        }

        collector.merge_duplicate_locations(&mut chunks);
        let collected = collector.stats();
        stats.unique_chunks = collected.unique_hashes;
        stats.duplicate_count = collected.duplicate_occurrences;
        stats.duplicated_hashes = collected.duplicated_hashes;

        let chunks = self.split_all(chunks, &mut stats);
        stats.total_chunks = chunks.len();

        info!(
            files = stats.files_processed,
            failed = stats.files_failed,
            skipped = stats.files_skipped,
            unique = stats.unique_chunks,
            duplicates = stats.duplicate_count,
            splits = stats.split_chunks_created,
            chunks = stats.total_chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chunking run complete"
        );

        Ok(ChunkingRun {
            chunks,
            statistics: stats,
        })
    }

    /// Read and extract a batch; results are in batch order
    fn extract_batch(&self, source: &dyn SourceSet, batch: &[SourceFile]) -> Vec<FileOutcome> {
        if self.config.parallel {
            batch
                .par_iter()
                .map(|file| self.extract_file(source, file))
                .collect()
        } else {
            batch
                .iter()
                .map(|file| self.extract_file(source, file))
                .collect()
        }
    }

    fn extract_file(&self, source: &dyn SourceSet, file: &SourceFile) -> FileOutcome {
        let bytes = match source.read_file(file) {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %file.path, error = %e, "Cannot read file, excluding from run");
                return FileOutcome::Failed(FailureRecord {
                    path: file.path.clone(),
                    kind: FailureKind::FileAccess,
                    stage: FileStage::Parsing,
                    reason: failure_reason(&e),
                });
            }
        };

        FileOutcome::Extracted(self.extractor.extract(&file.path, &file.language, &bytes))
    }

    /// Replace oversized chunks with their fragments, in place and in order
    fn split_all(&self, chunks: Vec<Chunk>, stats: &mut RunStatistics) -> Vec<Chunk> {
        let results: Vec<Result<Vec<Chunk>>> = if self.config.parallel {
            chunks.par_iter().map(|c| self.splitter.split(c)).collect()
        } else {
            chunks.iter().map(|c| self.splitter.split(c)).collect()
        };

        let mut output = Vec::with_capacity(chunks.len());
        for (chunk, result) in chunks.into_iter().zip(results) {
            match result {
                Ok(parts) if parts.len() == 1 && !parts[0].is_split() => output.push(chunk),
                Ok(parts) => {
                    debug!(location = %chunk.location(), parts = parts.len(), "Chunk split");
                    stats.units_split += 1;
                    stats.split_chunks_created += parts.len();
                    output.extend(parts);
                }
                Err(e) => {
                    warn!(location = %chunk.location(), error = %e, "Malformed unit kept unsplit");
                    stats.failures.push(FailureRecord {
                        path: chunk.file_path.clone(),
                        kind: FailureKind::MalformedUnit,
                        stage: FileStage::Splitting,
                        reason: failure_reason(&e),
                    });
                    output.push(chunk);
                }
            }
        }
        output
    }
}

fn failure_reason(error: &Error) -> String {
    match error {
        Error::FileAccess { reason, .. } | Error::MalformedUnit { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
