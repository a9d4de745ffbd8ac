//! Bash node tables

use super::Grammar;

const BASH_SEMANTIC_NODES: &[&str] = &["function_definition"];

const BASH_CONTAINER_NODES: &[&str] = &[];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "bash",
        tree_sitter_bash::LANGUAGE.into(),
        BASH_SEMANTIC_NODES,
        BASH_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_bash::LANGUAGE.into();
        for kind in BASH_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
