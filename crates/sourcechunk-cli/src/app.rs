//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sourcechunk")]
#[command(
    author,
    version,
    about = "AST-aware, deduplicating, token-bounded chunking of source repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "SOURCECHUNK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chunk a repository and write its chunk store
    Chunk(ChunkArgs),

    /// Summarise an existing chunk store
    Inspect(InspectArgs),

    /// List languages with a registered grammar
    Languages,
}

#[derive(Args)]
pub struct ChunkArgs {
    /// Repository root
    pub path: PathBuf,

    /// Name used for the store directory (defaults to the root's name)
    #[arg(long)]
    pub repo_name: Option<String>,

    #[arg(long)]
    pub max_tokens: Option<usize>,

    #[arg(long)]
    pub overlap_tokens: Option<usize>,

    /// whitespace, heuristic or tiktoken
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Directory holding per-repository chunk stores
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Stop after this many files
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Extract files on the calling thread only
    #[arg(long)]
    pub serial: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// chunks.json or the directory containing it
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
