//! C node tables

use super::Grammar;

const C_SEMANTIC_NODES: &[&str] = &[
    "function_definition",
    "struct_specifier",
    "union_specifier",
    "enum_specifier",
    "type_definition",
    "preproc_include",
];

const C_CONTAINER_NODES: &[&str] = &[
    "struct_specifier",
    "union_specifier",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "c",
        tree_sitter_c::LANGUAGE.into(),
        C_SEMANTIC_NODES,
        C_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_c::LANGUAGE.into();
        for kind in C_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
