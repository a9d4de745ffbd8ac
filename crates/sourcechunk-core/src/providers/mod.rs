//! Source sets
//!
//! A [`SourceSet`] lists the files of one repository in a stable order and
//! reads their bytes on demand. Paths are forward-slash and relative to the
//! repository root.
//! - [`FileSourceSet`]: a directory on disk
//! - [`MemorySourceSet`]: in-memory files, for tests and embedding callers

use crate::error::{Error, Result};
use crate::index::ast_chunker::language_for_path;
use std::collections::BTreeMap;
use std::path::Path;

pub mod file;

pub use file::FileSourceSet;

/// One discovered file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceFile {
    /// Forward-slash path relative to the repository root
    pub path: String,
    /// Language tag; may name a language without a registered grammar
    pub language: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
        }
    }
}

/// Ordered collection of files to chunk
pub trait SourceSet: Send + Sync {
    /// Source type identifier (e.g. "file", "memory")
    fn source_type(&self) -> &'static str;

    /// All files, sorted by path
    fn list_files(&self) -> Result<Vec<SourceFile>>;

    /// Raw bytes of one listed file
    fn read_file(&self, file: &SourceFile) -> Result<Vec<u8>>;

    /// Name used for the repository when none is given
    fn root_name(&self) -> Option<String> {
        None
    }
}

enum MemoryEntry {
    Content(Vec<u8>),
    Unreadable(String),
}

/// In-memory [`SourceSet`]
#[derive(Default)]
pub struct MemorySourceSet {
    name: Option<String>,
    files: BTreeMap<String, (String, MemoryEntry)>,
}

impl MemorySourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a file with an explicit language tag
    pub fn add(
        &mut self,
        path: impl Into<String>,
        language: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.files.insert(
            path.into(),
            (language.into(), MemoryEntry::Content(content.into())),
        );
        self
    }

    /// Add a file, detecting its language from the path
    pub fn add_detected(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        let path = path.into();
        let language = language_for_path(Path::new(&path)).unwrap_or("unknown");
        self.add(path, language, content)
    }

    /// Add a listed file whose read always fails
    pub fn add_unreadable(
        &mut self,
        path: impl Into<String>,
        language: impl Into<String>,
        reason: impl Into<String>,
    ) -> &mut Self {
        self.files.insert(
            path.into(),
            (language.into(), MemoryEntry::Unreadable(reason.into())),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceSet for MemorySourceSet {
    fn source_type(&self) -> &'static str {
        "memory"
    }

    fn list_files(&self) -> Result<Vec<SourceFile>> {
        Ok(self
            .files
            .iter()
            .map(|(path, (language, _))| SourceFile::new(path.clone(), language.clone()))
            .collect())
    }

    fn read_file(&self, file: &SourceFile) -> Result<Vec<u8>> {
        match self.files.get(&file.path) {
            Some((_, MemoryEntry::Content(bytes))) => Ok(bytes.clone()),
            Some((_, MemoryEntry::Unreadable(reason))) => Err(Error::FileAccess {
                path: file.path.clone(),
                reason: reason.clone(),
            }),
            None => Err(Error::FileAccess {
                path: file.path.clone(),
                reason: "not in source set".to_string(),
            }),
        }
    }

    fn root_name(&self) -> Option<String> {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_is_sorted() {
        let mut source = MemorySourceSet::new();
        source.add("b.py", "python", "x = 1");
        source.add("a.py", "python", "y = 2");
        let files = source.list_files().unwrap();
        assert_eq!(files[0].path, "a.py");
        assert_eq!(files[1].path, "b.py");
    }

    #[test]
    fn test_add_detected() {
        let mut source = MemorySourceSet::new();
        source.add_detected("src/lib.rs", "fn a() {}");
        source.add_detected("notes.txt", "hello");
        let files = source.list_files().unwrap();
        assert_eq!(files[0].language, "unknown");
        assert_eq!(files[1].language, "rust");
    }

    #[test]
    fn test_unreadable_file() {
        let mut source = MemorySourceSet::new();
        source.add_unreadable("locked.py", "python", "permission denied");
        let file = &source.list_files().unwrap()[0];
        let err = source.read_file(file).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_root_name() {
        let source = MemorySourceSet::new().with_name("demo");
        assert_eq!(source.root_name().as_deref(), Some("demo"));
        assert_eq!(source.source_type(), "memory");
    }
}
