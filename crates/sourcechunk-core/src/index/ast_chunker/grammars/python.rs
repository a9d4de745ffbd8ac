//! Python node tables

use super::Grammar;

const PYTHON_SEMANTIC_NODES: &[&str] = &[
    "function_definition",
    "class_definition",
    "decorated_definition",
    "import_statement",
    "import_from_statement",
];

const PYTHON_CONTAINER_NODES: &[&str] = &["class_definition"];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "python",
        tree_sitter_python::LANGUAGE.into(),
        PYTHON_SEMANTIC_NODES,
        PYTHON_CONTAINER_NODES,
    )
}
