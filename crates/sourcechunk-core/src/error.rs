//! Error types for sourcechunk

use thiserror::Error;

/// Result type alias using SourceChunkError
pub type Result<T> = std::result::Result<T, SourceChunkError>;

/// Error type alias for convenience
pub type Error = SourceChunkError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for sourcechunk
#[derive(Debug, Error)]
pub enum SourceChunkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid root path: {0}")]
    InvalidRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No grammar for the language, or the grammar failed on the input
    #[error("Parse unavailable for {language}: {reason}")]
    ParseUnavailable { language: String, reason: String },

    #[error("Cannot read {path}: {reason}")]
    FileAccess { path: String, reason: String },

    #[error("Malformed unit {location}: {reason}")]
    MalformedUnit { location: String, reason: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Chunk store not found: {0}")]
    StoreNotFound(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SourceChunkError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StoreNotFound(_) => exit_codes::NOT_FOUND,
            Self::Config(_) | Self::InvalidRoot(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Whether this error aborts a chunking run.
    ///
    /// Everything else is caught per file or per unit and recorded in the
    /// run statistics.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidRoot(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_and_root_are_fatal() {
        assert!(SourceChunkError::Config("max_tokens".into()).is_fatal());
        assert!(SourceChunkError::InvalidRoot("/nope".into()).is_fatal());
        assert!(!SourceChunkError::ParseUnavailable {
            language: "cobol".into(),
            reason: "no grammar".into(),
        }
        .is_fatal());
        assert!(!SourceChunkError::FileAccess {
            path: "a.rs".into(),
            reason: "denied".into(),
        }
        .is_fatal());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            SourceChunkError::Config("x".into()).exit_code(),
            exit_codes::INVALID_INPUT
        );
        assert_eq!(
            SourceChunkError::StoreNotFound("chunks.json".into()).exit_code(),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            SourceChunkError::Embedding("down".into()).exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }
}
