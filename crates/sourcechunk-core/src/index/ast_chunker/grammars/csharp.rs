//! C# node tables

use super::Grammar;

const CSHARP_SEMANTIC_NODES: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "method_declaration",
    "constructor_declaration",
    "property_declaration",
    "using_directive",
];

const CSHARP_CONTAINER_NODES: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "csharp",
        tree_sitter_c_sharp::LANGUAGE.into(),
        CSHARP_SEMANTIC_NODES,
        CSHARP_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_c_sharp::LANGUAGE.into();
        for kind in CSHARP_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
