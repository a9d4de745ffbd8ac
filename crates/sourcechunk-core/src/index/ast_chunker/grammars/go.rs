//! Go node tables

use super::Grammar;

const GO_SEMANTIC_NODES: &[&str] = &[
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "import_declaration",
];

const GO_CONTAINER_NODES: &[&str] = &["type_declaration"];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "go",
        tree_sitter_go::LANGUAGE.into(),
        GO_SEMANTIC_NODES,
        GO_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        for kind in GO_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
