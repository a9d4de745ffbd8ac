//! Grammar registry
//!
//! A [`Grammar`] bundles a parser with the node kinds that count as
//! semantic units and the subset of those that act as containers. The
//! registry maps language tags to grammars and is read-only once a run
//! starts.

mod bash;
mod c;
mod cpp;
mod csharp;
mod go;
mod java;
mod javascript;
mod php;
mod python;
mod ruby;
mod rust;

use super::parser::{SyntaxParser, TreeSitterParser};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Node kinds whose name comes from the code they are bound to
const ANONYMOUS_KINDS: &[&str] = &["arrow_function", "function_expression"];

/// Parsing capability plus node-kind tables for one language
pub struct Grammar {
    language: String,
    parser: Arc<dyn SyntaxParser>,
    semantic_kinds: HashSet<String>,
    container_kinds: HashSet<String>,
}

impl Grammar {
    /// Container kinds are always treated as semantic too
    pub fn new(
        language: impl Into<String>,
        parser: Arc<dyn SyntaxParser>,
        semantic_kinds: &[&str],
        container_kinds: &[&str],
    ) -> Self {
        let container_kinds: HashSet<String> =
            container_kinds.iter().map(|k| k.to_string()).collect();
        let mut semantic: HashSet<String> =
            semantic_kinds.iter().map(|k| k.to_string()).collect();
        semantic.extend(container_kinds.iter().cloned());

        Self {
            language: language.into(),
            parser,
            semantic_kinds: semantic,
            container_kinds,
        }
    }

    pub(crate) fn tree_sitter(
        language: &str,
        ts_language: tree_sitter::Language,
        semantic_kinds: &[&str],
        container_kinds: &[&str],
    ) -> Self {
        Self::new(
            language,
            Arc::new(TreeSitterParser::new(ts_language)),
            semantic_kinds,
            container_kinds,
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn parser(&self) -> &dyn SyntaxParser {
        self.parser.as_ref()
    }

    pub fn is_semantic(&self, kind: &str) -> bool {
        self.semantic_kinds.contains(kind)
    }

    pub fn is_container(&self, kind: &str) -> bool {
        self.container_kinds.contains(kind)
    }

    /// Function literals named by their assignment target
    pub fn is_anonymous(&self, kind: &str) -> bool {
        ANONYMOUS_KINDS.contains(&kind)
    }

    pub fn semantic_kinds(&self) -> impl Iterator<Item = &str> {
        self.semantic_kinds.iter().map(String::as_str)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("language", &self.language)
            .field("semantic_kinds", &self.semantic_kinds.len())
            .field("container_kinds", &self.container_kinds.len())
            .finish()
    }
}

/// Language tag to grammar mapping
#[derive(Debug, Default, Clone)]
pub struct GrammarRegistry {
    grammars: HashMap<String, Arc<Grammar>>,
}

impl GrammarRegistry {
    /// Empty registry; every file falls back to a single unit
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in grammar
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(rust::grammar());
        registry.register(python::grammar());
        registry.register(javascript::grammar());
        registry.register(javascript::typescript_grammar());
        registry.register(javascript::tsx_grammar());
        registry.register(go::grammar());
        registry.register(java::grammar());
        registry.register(c::grammar());
        registry.register(cpp::grammar());
        registry.register(csharp::grammar());
        registry.register(php::grammar());
        registry.register(ruby::grammar());
        registry.register(bash::grammar());
        registry
    }

    /// Add or replace the grammar for its language tag
    pub fn register(&mut self, grammar: Grammar) {
        self.grammars
            .insert(grammar.language().to_string(), Arc::new(grammar));
    }

    pub fn get(&self, language: &str) -> Option<Arc<Grammar>> {
        self.grammars.get(language).cloned()
    }

    pub fn contains(&self, language: &str) -> bool {
        self.grammars.contains_key(language)
    }

    /// Registered tags in sorted order
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}
