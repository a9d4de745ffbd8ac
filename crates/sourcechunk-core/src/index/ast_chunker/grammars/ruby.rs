//! Ruby node tables

use super::Grammar;

const RUBY_SEMANTIC_NODES: &[&str] = &[
    "method",
    "singleton_method",
    "class",
    "module",
];

const RUBY_CONTAINER_NODES: &[&str] = &[
    "class",
    "module",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "ruby",
        tree_sitter_ruby::LANGUAGE.into(),
        RUBY_SEMANTIC_NODES,
        RUBY_CONTAINER_NODES,
    )
}
