//! PHP node tables

use super::Grammar;

const PHP_SEMANTIC_NODES: &[&str] = &[
    "function_definition",
    "class_declaration",
    "interface_declaration",
    "trait_declaration",
    "method_declaration",
    "namespace_use_declaration",
];

const PHP_CONTAINER_NODES: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "trait_declaration",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "php",
        tree_sitter_php::LANGUAGE_PHP.into(),
        PHP_SEMANTIC_NODES,
        PHP_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_php::LANGUAGE_PHP.into();
        for kind in PHP_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
