//! Configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default token budget per chunk
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Default overlap carried between consecutive splits
pub const DEFAULT_OVERLAP_TOKENS: usize = 50;

/// Default directory (relative to the output base) for persisted chunks
pub const DEFAULT_CHUNKS_DIR: &str = ".sourcechunk/chunks";

/// Files and directories skipped during discovery
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    ".venv",
    "venv",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "*.egg-info",
    "dist",
    "build",
    // JavaScript / TypeScript
    "node_modules",
    "bower_components",
    "*.min.js",
    "*.bundle.js",
    ".next",
    ".nuxt",
    "out",
    ".cache",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    // JVM
    "target",
    "*.class",
    "*.jar",
    ".gradle",
    // Native
    "*.o",
    "*.so",
    "*.dylib",
    "*.dll",
    "*.exe",
    "*.a",
    "CMakeFiles",
    // Rust
    "Cargo.lock",
    // Go / PHP
    "vendor",
    "composer.lock",
    // .NET
    "bin",
    "obj",
    // Editors and OS
    ".idea",
    ".vscode",
    ".DS_Store",
    "*.log",
    "*.tmp",
    "*.swp",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Token budget and splitting behaviour
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// File discovery settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Where chunk stores are written
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which token counter the splitter uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Whitespace-separated words
    Whitespace,
    /// Characters divided by four
    Heuristic,
    /// cl100k_base BPE
    #[default]
    Tiktoken,
}

impl TokenizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Heuristic => "heuristic",
            Self::Tiktoken => "tiktoken",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "whitespace" | "words" => Some(Self::Whitespace),
            "heuristic" | "chars" => Some(Self::Heuristic),
            "tiktoken" | "cl100k" | "cl100k_base" => Some(Self::Tiktoken),
            _ => None,
        }
    }
}

/// Chunk size configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum tokens per chunk before it is split
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Tokens of trailing context repeated at the head of the next split
    #[serde(default = "default_overlap_tokens")]
    pub overlap_tokens: usize,

    /// Token counter used for budgeting
    #[serde(default)]
    pub tokenizer: TokenizerKind,

    /// Extract files on the rayon pool instead of the calling thread
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            overlap_tokens: default_overlap_tokens(),
            tokenizer: std::env::var("SOURCECHUNK_TOKENIZER")
                .ok()
                .and_then(|s| TokenizerKind::parse(&s))
                .unwrap_or_default(),
            parallel: default_parallel(),
        }
    }
}

impl ChunkingConfig {
    /// Budget with explicit limits and default tokenizer
    pub fn new(max_tokens: usize, overlap_tokens: usize) -> Self {
        Self {
            max_tokens,
            overlap_tokens,
            ..Default::default()
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject budgets the splitter cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".to_string()));
        }
        if self.overlap_tokens >= self.max_tokens {
            return Err(Error::Config(format!(
                "overlap_tokens ({}) must be less than max_tokens ({})",
                self.overlap_tokens, self.max_tokens
            )));
        }
        Ok(())
    }
}

fn default_max_tokens() -> usize {
    std::env::var("SOURCECHUNK_MAX_TOKENS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TOKENS)
}

fn default_overlap_tokens() -> usize {
    std::env::var("SOURCECHUNK_OVERLAP_TOKENS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_OVERLAP_TOKENS)
}

fn default_parallel() -> bool {
    true
}

/// File discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Glob patterns matched against path components and the relative path
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Skip dot-files and dot-directories
    #[serde(default = "default_true")]
    pub exclude_hidden: bool,

    #[serde(default = "default_true")]
    pub follow_symlinks: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            exclude_hidden: true,
            follow_symlinks: true,
        }
    }
}

fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// Output location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one subdirectory per repository
    #[serde(default = "default_chunks_dir")]
    pub chunks_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chunks_dir: default_chunks_dir(),
        }
    }
}

fn default_chunks_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CHUNKS_DIR)
}

impl OutputConfig {
    /// Storage directory for one repository: `<base>/<chunks_dir>/<sanitized name>`
    pub fn repository_dir(&self, base: &Path, repo_name: &str) -> Result<PathBuf> {
        let safe = sanitize_repository_name(repo_name)?;
        let dir = if self.chunks_dir.is_absolute() {
            self.chunks_dir.clone()
        } else {
            base.join(&self.chunks_dir)
        };
        Ok(dir.join(safe))
    }
}

/// Make a repository name safe for use as a directory / collection name.
///
/// Non `[A-Za-z0-9._-]` characters become `_`; the result starts and ends
/// with an alphanumeric character and is at most 63 characters long.
pub fn sanitize_repository_name(repo_name: &str) -> Result<String> {
    if repo_name.is_empty() {
        return Err(Error::Config("repository name cannot be empty".to_string()));
    }

    let mut sanitized: String = repo_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !sanitized.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        sanitized.insert(0, 'c');
    }
    if !sanitized.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        sanitized.push('0');
    }
    sanitized.truncate(63);
    Ok(sanitized)
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Validate everything a run depends on
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        for pattern in &self.source.ignore_patterns {
            glob::Pattern::new(pattern)?;
        }
        Ok(())
    }
}
