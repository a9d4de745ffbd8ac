//! File system source set
//!
//! Walks a repository directory, skipping ignored and hidden entries, and
//! keeps every file whose language can be detected from its path.

use super::{SourceFile, SourceSet};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::index::ast_chunker::language_for_path;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Repository directory on disk
#[derive(Debug)]
pub struct FileSourceSet {
    root: PathBuf,
    ignore: Vec<Pattern>,
    exclude_hidden: bool,
    follow_symlinks: bool,
}

impl FileSourceSet {
    /// Fails with [`Error::InvalidRoot`] when `root` is not a directory
    pub fn new(root: impl AsRef<Path>, config: &SourceConfig) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::InvalidRoot(format!(
                "{} does not exist or is not a directory",
                root.display()
            )));
        }
        let root = root.canonicalize()?;

        let ignore = config
            .ignore_patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            root,
            ignore,
            exclude_hidden: config.exclude_hidden,
            follow_symlinks: config.follow_symlinks,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_ignored(&self, name: &str, relative: &str) -> bool {
        self.ignore
            .iter()
            .any(|p| p.matches(name) || p.matches(relative))
    }

    fn should_skip(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if self.exclude_hidden && name.starts_with('.') {
            return true;
        }
        let relative = self.relative_path(entry.path());
        self.is_ignored(&name, &relative)
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

impl SourceSet for FileSourceSet {
    fn source_type(&self) -> &'static str {
        "file"
    }

    fn list_files(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(|e| !self.should_skip(e));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = self.relative_path(entry.path());
            match language_for_path(entry.path()) {
                Some(language) => files.push(SourceFile::new(relative, language)),
                None => debug!(path = %relative, "Skipping file with unknown language"),
            }
        }

        files.sort();
        debug!(root = %self.root.display(), files = files.len(), "Discovered files");
        Ok(files)
    }

    fn read_file(&self, file: &SourceFile) -> Result<Vec<u8>> {
        let path = self.root.join(&file.path);
        std::fs::read(&path).map_err(|e| Error::FileAccess {
            path: file.path.clone(),
            reason: e.to_string(),
        })
    }

    fn root_name(&self) -> Option<String> {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("src/nested")).unwrap();
        fs::create_dir_all(base.join("node_modules/dep")).unwrap();
        fs::create_dir_all(base.join(".hidden")).unwrap();
        fs::write(base.join("src/main.py"), "def main():\n    pass\n").unwrap();
        fs::write(base.join("src/nested/util.rs"), "fn util() {}\n").unwrap();
        fs::write(base.join("src/app.min.js"), "var a=1;").unwrap();
        fs::write(base.join("node_modules/dep/index.js"), "module.exports = 1;").unwrap();
        fs::write(base.join(".hidden/secret.py"), "x = 1").unwrap();
        fs::write(base.join("README.txt"), "plain text").unwrap();
        fs::write(base.join("Dockerfile"), "FROM scratch\n").unwrap();
        temp
    }

    #[test]
    fn test_file_source_type() {
        let temp = repo();
        let source = FileSourceSet::new(temp.path(), &SourceConfig::default()).unwrap();
        assert_eq!(source.source_type(), "file");
    }

    #[test]
    fn test_list_files_skips_ignored_and_hidden() {
        let temp = repo();
        let source = FileSourceSet::new(temp.path(), &SourceConfig::default()).unwrap();
        let paths: Vec<String> = source
            .list_files()
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(paths, vec!["Dockerfile", "src/main.py", "src/nested/util.rs"]);
    }

    #[test]
    fn test_include_hidden_when_configured() {
        let temp = repo();
        let config = SourceConfig {
            exclude_hidden: false,
            ..SourceConfig::default()
        };
        let source = FileSourceSet::new(temp.path(), &config).unwrap();
        let files = source.list_files().unwrap();
        assert!(files.iter().any(|f| f.path == ".hidden/secret.py"));
    }

    #[test]
    fn test_read_file() {
        let temp = repo();
        let source = FileSourceSet::new(temp.path(), &SourceConfig::default()).unwrap();
        let file = SourceFile::new("src/main.py", "python");
        assert_eq!(source.read_file(&file).unwrap(), b"def main():\n    pass\n");
    }

    #[test]
    fn test_read_missing_file_is_file_access() {
        let temp = repo();
        let source = FileSourceSet::new(temp.path(), &SourceConfig::default()).unwrap();
        let err = source
            .read_file(&SourceFile::new("gone.py", "python"))
            .unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_invalid_root() {
        let err = FileSourceSet::new("/definitely/not/here", &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRoot(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_root_removed_after_open_is_walk_error() {
        let temp = repo();
        let root = temp.path().to_path_buf();
        let source = FileSourceSet::new(&root, &SourceConfig::default()).unwrap();
        fs::remove_dir_all(&root).unwrap();

        let err = source.list_files().unwrap_err();
        assert!(matches!(err, Error::WalkDir(_)));
        assert!(!err.is_fatal());
    }
}
