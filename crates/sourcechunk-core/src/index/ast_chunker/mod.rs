//! AST-aware semantic unit extraction
//!
//! Parses a file with the grammar registered for its language and walks
//! the tree with an explicit stack, emitting one [`SemanticUnit`] per node
//! whose kind is semantic for that grammar. Containers become the parent
//! of every unit nested inside them. Files without a usable grammar, or
//! whose tree yields nothing, become a single file-level unit. Notebooks
//! are split into cells first, see [`notebook`].

pub mod grammars;
pub mod language;
pub mod naming;
pub mod notebook;
pub mod parser;
pub mod types;

pub use grammars::{Grammar, GrammarRegistry};
pub use language::{is_supported, language_for_extension, language_for_path, GRAMMAR_LANGUAGES};
pub use parser::{NodeId, SyntaxNode, SyntaxParser, SyntaxTree, SyntaxTreeBuilder, TreeSitterParser};
pub use types::{
    compute_content_hash, format_location, CellInfo, SemanticUnit, UnitId, FALLBACK_KIND,
};

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Units extracted from one file
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub units: Vec<SemanticUnit>,
    /// Set when the file was reduced to one unit because parsing was unavailable
    pub fallback: Option<String>,
}

impl Extraction {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

enum Visit {
    Enter(NodeId),
    /// Leaving a container; pops the parent stack
    Exit,
}

/// Turns file contents into semantic units
#[derive(Debug, Clone)]
pub struct UnitExtractor {
    registry: Arc<GrammarRegistry>,
}

impl Default for UnitExtractor {
    fn default() -> Self {
        Self::new(Arc::new(GrammarRegistry::with_defaults()))
    }
}

impl UnitExtractor {
    pub fn new(registry: Arc<GrammarRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    /// Extract units from `source`
    ///
    /// Never fails: parse problems degrade to a fallback unit and are
    /// reported through [`Extraction::fallback`]. Empty or whitespace-only
    /// files produce no units at all.
    pub fn extract(&self, file_path: &str, language: &str, source: &[u8]) -> Extraction {
        let text = String::from_utf8_lossy(source);
        if text.trim().is_empty() {
            debug!(path = %file_path, "Skipping empty file");
            return Extraction::default();
        }

        if language == notebook::NOTEBOOK_LANGUAGE {
            return notebook::extract(&self.registry, file_path, source);
        }

        let grammar = match self.registry.get(language) {
            Some(g) => g,
            None => {
                let reason = format!("no grammar registered for {}", language);
                warn!(path = %file_path, language = %language, "{}, using file-level unit", reason);
                return Extraction {
                    units: vec![fallback_unit(file_path, language, source)],
                    fallback: Some(reason),
                };
            }
        };

        let tree = match grammar.parser().parse(source) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %file_path,
                    language = %language,
                    "AST parse failed, using file-level unit"
                );
                return Extraction {
                    units: vec![fallback_unit(file_path, language, source)],
                    fallback: Some(e.to_string()),
                };
            }
        };

        let mut units = collect_units(&tree, &grammar, file_path, source);
        if units.is_empty() {
            debug!(path = %file_path, language = %language, "No semantic nodes, using file-level unit");
            units.push(fallback_unit(file_path, language, source));
        }

        debug!(path = %file_path, units = units.len(), "Extracted units");
        Extraction {
            units,
            fallback: None,
        }
    }

    /// Detect the language from the path, then extract
    pub fn extract_path(&self, path: &Path, source: &[u8]) -> Extraction {
        let language = language_for_path(path).unwrap_or("unknown");
        let file_path = path.to_string_lossy().replace('\\', "/");
        self.extract(&file_path, language, source)
    }
}

/// Pre-order walk with an explicit stack; no recursion on tree depth
fn collect_units(
    tree: &SyntaxTree,
    grammar: &Grammar,
    file_path: &str,
    source: &[u8],
) -> Vec<SemanticUnit> {
    let root = match tree.root() {
        Some(r) => r,
        None => return Vec::new(),
    };

    let mut units = Vec::new();
    let mut parents: Vec<UnitId> = Vec::new();
    let mut stack = vec![Visit::Enter(root)];

    while let Some(visit) = stack.pop() {
        let node = match visit {
            Visit::Enter(node) => node,
            Visit::Exit => {
                parents.pop();
                continue;
            }
        };

        let kind = tree.kind(node);
        let mut opened_container = false;

        if grammar.is_semantic(kind) {
            let unit = build_unit(tree, grammar, node, file_path, source, parents.last().copied());
            if unit.is_container {
                parents.push(unit.id);
                opened_container = true;
            }
            units.push(unit);
        }

        if opened_container {
            stack.push(Visit::Exit);
        }
        for &child in tree.children(node).iter().rev() {
            stack.push(Visit::Enter(child));
        }
    }

    link_children(&mut units);
    units
}

fn build_unit(
    tree: &SyntaxTree,
    grammar: &Grammar,
    node: NodeId,
    file_path: &str,
    source: &[u8],
    parent_id: Option<UnitId>,
) -> SemanticUnit {
    let kind = tree.kind(node);
    let info = tree.node(node);
    SemanticUnit {
        id: UnitId::new(),
        kind: kind.to_string(),
        name: naming::unit_name(tree, node, source, grammar.is_anonymous(kind)),
        raw_text: tree.text(node, source),
        file_path: file_path.to_string(),
        language: grammar.language().to_string(),
        start_line: info.start_row + 1,
        end_line: info.end_row + 1,
        start_offset: info.start_byte,
        end_offset: info.end_byte,
        is_container: grammar.is_container(kind),
        parent_id,
        child_ids: Vec::new(),
        cell: None,
    }
}

/// Fill `child_ids` from the `parent_id` links, preserving source order
fn link_children(units: &mut [SemanticUnit]) {
    let index: HashMap<UnitId, usize> = units
        .iter()
        .enumerate()
        .map(|(i, u)| (u.id, i))
        .collect();

    let links: Vec<(usize, UnitId)> = units
        .iter()
        .filter_map(|u| u.parent_id.and_then(|p| index.get(&p)).map(|&i| (i, u.id)))
        .collect();

    for (parent, child) in links {
        units[parent].child_ids.push(child);
    }
}

/// Whole-file unit used when no semantic units can be produced
pub fn fallback_unit(file_path: &str, language: &str, source: &[u8]) -> SemanticUnit {
    let text = String::from_utf8_lossy(source);
    let name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());

    SemanticUnit {
        id: UnitId::new(),
        kind: FALLBACK_KIND.to_string(),
        name,
        raw_text: text.to_string(),
        file_path: file_path.to_string(),
        language: language.to_string(),
        start_line: 1,
        end_line: text.lines().count().max(1),
        start_offset: 0,
        end_offset: source.len(),
        is_container: false,
        parent_id: None,
        child_ids: Vec::new(),
        cell: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> UnitExtractor {
        UnitExtractor::default()
    }

    fn by_name<'a>(units: &'a [SemanticUnit], name: &str) -> &'a SemanticUnit {
        units.iter().find(|u| u.name == name).unwrap()
    }

    #[test]
    fn test_python_class_with_methods() {
        let source = "class Greeter:\n    def hello(self):\n        return 1\n\n    def bye(self):\n        return 2\n";
        let extraction = extractor().extract("greet.py", "python", source.as_bytes());
        assert!(!extraction.is_fallback());

        let units = extraction.units;
        assert_eq!(units.len(), 3);

        let class = by_name(&units, "Greeter");
        let hello = by_name(&units, "hello");
        let bye = by_name(&units, "bye");

        assert!(class.is_container);
        assert_eq!(class.parent_id, None);
        assert_eq!(class.child_ids, vec![hello.id, bye.id]);
        assert_eq!(hello.parent_id, Some(class.id));
        assert_eq!(bye.parent_id, Some(class.id));
        assert_eq!(class.start_line, 1);
        assert_eq!(class.end_line, 6);
        assert_eq!(hello.start_line, 2);
        assert_eq!(hello.end_line, 3);
    }

    #[test]
    fn test_units_in_source_order() {
        let source = "def a():\n    pass\n\ndef b():\n    pass\n";
        let units = extractor().extract("m.py", "python", source.as_bytes()).units;
        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_offsets_slice_raw_text() {
        let source = "import os\n\nfn_text = 1\n\ndef run():\n    return os.getcwd()\n";
        let units = extractor().extract("r.py", "python", source.as_bytes()).units;
        for unit in &units {
            assert_eq!(&source[unit.start_offset..unit.end_offset], unit.raw_text);
        }
    }

    #[test]
    fn test_nested_containers_use_nearest_parent() {
        let source = "mod outer {\n    impl Thing {\n        fn go(&self) {}\n    }\n}\n";
        let units = extractor().extract("lib.rs", "rust", source.as_bytes()).units;
        let outer = by_name(&units, "outer");
        let thing = by_name(&units, "Thing");
        let go = by_name(&units, "go");
        assert_eq!(thing.parent_id, Some(outer.id));
        assert_eq!(go.parent_id, Some(thing.id));
        assert_eq!(outer.child_ids, vec![thing.id]);
    }

    #[test]
    fn test_class_members_across_languages() {
        let cases = [
            ("server.cpp", "cpp", "class Server {\npublic:\n    void start() {}\n};\n", "Server", "start"),
            ("Greeter.cs", "csharp", "using System;\n\nclass Greeter {\n    public void Hello() {}\n}\n", "Greeter", "Hello"),
            ("cart.php", "php", "<?php\nclass Cart {\n    public function add() {}\n}\n", "Cart", "add"),
            ("greeter.rb", "ruby", "module Util\n  class Greeter\n    def hello\n    end\n  end\nend\n", "Greeter", "hello"),
        ];
        for (path, language, source, container, member) in cases {
            let extraction = extractor().extract(path, language, source.as_bytes());
            assert!(!extraction.is_fallback(), "{}", path);
            let class = by_name(&extraction.units, container);
            let method = by_name(&extraction.units, member);
            assert!(class.is_container, "{}", path);
            assert_eq!(method.parent_id, Some(class.id), "{}", path);
            assert_eq!(class.child_ids, vec![method.id], "{}", path);
        }
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let source = "IDENTIFICATION DIVISION.\nPROGRAM-ID. HELLO.\n";
        let extraction = extractor().extract("src/hello.cbl", "cobol", source.as_bytes());
        assert!(extraction.is_fallback());
        assert_eq!(extraction.units.len(), 1);

        let unit = &extraction.units[0];
        assert_eq!(unit.kind, FALLBACK_KIND);
        assert_eq!(unit.name, "hello.cbl");
        assert_eq!(unit.start_line, 1);
        assert_eq!(unit.end_line, 2);
        assert_eq!(unit.raw_text, source);
    }

    #[test]
    fn test_no_semantic_nodes_falls_back_without_reason() {
        let source = "x = 1\ny = 2\n";
        let extraction = extractor().extract("vars.py", "python", source.as_bytes());
        assert!(!extraction.is_fallback());
        assert_eq!(extraction.units.len(), 1);
        assert_eq!(extraction.units[0].kind, FALLBACK_KIND);
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        let extraction = extractor().extract("empty.py", "python", b"  \n\n");
        assert!(extraction.units.is_empty());
        assert!(!extraction.is_fallback());
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 500;
        let mut source = String::new();
        for i in 0..depth {
            source.push_str(&"    ".repeat(i.min(40)));
            source.push_str(&format!("mod m{} {{\n", i));
        }
        for _ in 0..depth {
            source.push_str("}\n");
        }
        let units = extractor().extract("deep.rs", "rust", source.as_bytes()).units;
        assert_eq!(units.len(), depth);
        assert_eq!(units[depth - 1].parent_id, Some(units[depth - 2].id));
    }

    #[test]
    fn test_extract_path_detects_language() {
        let extraction = extractor().extract_path(Path::new("pkg/main.go"), b"package main\n\nfunc main() {}\n");
        assert_eq!(extraction.units.len(), 1);
        assert_eq!(extraction.units[0].language, "go");
        assert_eq!(extraction.units[0].name, "main");
    }
}
