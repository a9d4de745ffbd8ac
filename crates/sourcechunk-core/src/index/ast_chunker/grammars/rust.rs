//! Rust node tables

use super::Grammar;

const RUST_SEMANTIC_NODES: &[&str] = &[
    "function_item",
    "impl_item",
    "struct_item",
    "enum_item",
    "trait_item",
    "mod_item",
    "use_declaration",
    "macro_definition",
    "const_item",
    "static_item",
    "type_item",
];

const RUST_CONTAINER_NODES: &[&str] = &[
    "impl_item",
    "struct_item",
    "enum_item",
    "trait_item",
    "mod_item",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "rust",
        tree_sitter_rust::LANGUAGE.into(),
        RUST_SEMANTIC_NODES,
        RUST_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_rust::LANGUAGE.into();
        for kind in RUST_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
