//! Language detection from file paths
//!
//! Maps a path to a language tag. Tags without a registered grammar are
//! still returned so those files reach the extractor and fall back to a
//! single file-level unit.

use std::path::Path;

/// Tags the default grammar registry can parse
pub const GRAMMAR_LANGUAGES: &[&str] = &[
    "rust",
    "python",
    "javascript",
    "typescript",
    "tsx",
    "go",
    "java",
    "c",
    "cpp",
    "csharp",
    "php",
    "ruby",
    "bash",
];

/// Detect the language tag for a repository-relative path
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let file_name = path.file_name()?.to_str()?;
    if let Some(lang) = language_for_file_name(file_name) {
        return Some(lang);
    }
    let ext = path.extension()?.to_str()?;
    language_for_extension(ext)
}

/// Files recognised by name rather than extension
fn language_for_file_name(name: &str) -> Option<&'static str> {
    match name {
        "Dockerfile" => Some("dockerfile"),
        "Makefile" | "makefile" | "GNUmakefile" => Some("make"),
        "Rakefile" | "Gemfile" => Some("ruby"),
        "build.gradle" | "settings.gradle" => Some("groovy"),
        _ => None,
    }
}

/// Detect language tag from file extension string
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "rs" => Some("rust"),
        "py" | "pyi" | "pyw" => Some("python"),
        "ipynb" => Some("ipynb"),
        "js" | "mjs" | "cjs" | "jsx" => Some("javascript"),
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        "go" => Some("go"),
        "java" => Some("java"),
        "kt" | "kts" => Some("kotlin"),
        "groovy" | "gradle" => Some("groovy"),
        "scala" | "sc" => Some("scala"),
        "c" | "h" => Some("c"),
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some("cpp"),
        "cs" => Some("csharp"),
        "php" | "phtml" => Some("php"),
        "rb" | "rake" => Some("ruby"),
        "swift" => Some("swift"),
        "lua" => Some("lua"),
        "sh" | "bash" | "zsh" | "fish" => Some("bash"),
        "sql" => Some("sql"),
        "ex" | "exs" => Some("elixir"),
        "hs" | "lhs" => Some("haskell"),
        "ml" | "mli" => Some("ocaml"),
        "zig" => Some("zig"),
        "sol" => Some("solidity"),
        "html" | "htm" => Some("html"),
        "css" | "scss" | "sass" | "less" => Some("css"),
        "json" | "jsonl" | "ndjson" => Some("json"),
        "yaml" | "yml" => Some("yaml"),
        "toml" => Some("toml"),
        "xml" => Some("xml"),
        "md" => Some("markdown"),
        "dockerfile" => Some("dockerfile"),
        "prisma" => Some("prisma"),
        _ => None,
    }
}

/// Check if a path is picked up by discovery at all
pub fn is_supported(path: &Path) -> bool {
    language_for_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_detection() {
        assert_eq!(language_for_path(Path::new("foo.rs")), Some("rust"));
        assert_eq!(language_for_path(Path::new("src/lib.rs")), Some("rust"));
    }

    #[test]
    fn test_python_detection() {
        assert_eq!(language_for_path(Path::new("foo.py")), Some("python"));
        assert_eq!(language_for_path(Path::new("foo.pyi")), Some("python"));
    }

    #[test]
    fn test_javascript_family() {
        assert_eq!(language_for_path(Path::new("foo.mjs")), Some("javascript"));
        assert_eq!(language_for_path(Path::new("foo.jsx")), Some("javascript"));
        assert_eq!(language_for_path(Path::new("foo.ts")), Some("typescript"));
        assert_eq!(language_for_path(Path::new("foo.tsx")), Some("tsx"));
    }

    #[test]
    fn test_file_name_detection() {
        assert_eq!(language_for_path(Path::new("docker/Dockerfile")), Some("dockerfile"));
        assert_eq!(language_for_path(Path::new("Makefile")), Some("make"));
    }

    #[test]
    fn test_gradle_scripts_are_groovy() {
        assert_eq!(language_for_path(Path::new("build.gradle")), Some("groovy"));
        assert_eq!(language_for_path(Path::new("app/settings.gradle")), Some("groovy"));
        assert_eq!(language_for_path(Path::new("deps.gradle")), Some("groovy"));
        assert_eq!(language_for_path(Path::new("build.gradle.kts")), Some("kotlin"));
    }

    #[test]
    fn test_notebook_detection() {
        assert_eq!(language_for_path(Path::new("notebooks/eda.ipynb")), Some("ipynb"));
        assert!(!GRAMMAR_LANGUAGES.contains(&"ipynb"));
    }

    #[test]
    fn test_case_insensitive_extension() {
        assert_eq!(language_for_path(Path::new("MAIN.GO")), Some("go"));
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(language_for_path(Path::new("foo.txt")), None);
        assert_eq!(language_for_path(Path::new("foo")), None);
        assert!(!is_supported(Path::new("image.png")));
    }

    #[test]
    fn test_grammar_languages_are_detectable() {
        assert!(is_supported(Path::new("a.java")));
        assert!(GRAMMAR_LANGUAGES.contains(&"tsx"));
        for path in ["a.c", "a.hpp", "a.cs", "a.php", "a.rb", "a.sh"] {
            let lang = language_for_path(Path::new(path)).unwrap();
            assert!(GRAMMAR_LANGUAGES.contains(&lang), "{}", path);
        }
    }
}
