//! JavaScript and TypeScript node tables
//!
//! TypeScript and TSX share one table. Statement-level kinds such as
//! `lexical_declaration` or `export_statement` are left out; the function
//! and class nodes inside them are already captured on their own.

use super::Grammar;

const JS_SEMANTIC_NODES: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "arrow_function",
    "class_declaration",
    "method_definition",
    "import_statement",
];

const JS_CONTAINER_NODES: &[&str] = &["class_declaration"];

const TS_SEMANTIC_NODES: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "arrow_function",
    "class_declaration",
    "abstract_class_declaration",
    "method_definition",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
    "import_statement",
];

const TS_CONTAINER_NODES: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "javascript",
        tree_sitter_javascript::LANGUAGE.into(),
        JS_SEMANTIC_NODES,
        JS_CONTAINER_NODES,
    )
}

pub fn typescript_grammar() -> Grammar {
    Grammar::tree_sitter(
        "typescript",
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        TS_SEMANTIC_NODES,
        TS_CONTAINER_NODES,
    )
}

pub fn tsx_grammar() -> Grammar {
    Grammar::tree_sitter(
        "tsx",
        tree_sitter_typescript::LANGUAGE_TSX.into(),
        TS_SEMANTIC_NODES,
        TS_CONTAINER_NODES,
    )
}
