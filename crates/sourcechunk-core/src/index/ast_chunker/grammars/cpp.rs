//! C++ node tables

use super::Grammar;

const CPP_SEMANTIC_NODES: &[&str] = &[
    "function_definition",
    "class_specifier",
    "struct_specifier",
    "namespace_definition",
    "enum_specifier",
    "preproc_include",
];

const CPP_CONTAINER_NODES: &[&str] = &[
    "class_specifier",
    "struct_specifier",
    "namespace_definition",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "cpp",
        tree_sitter_cpp::LANGUAGE.into(),
        CPP_SEMANTIC_NODES,
        CPP_CONTAINER_NODES,
    )
}
