//! Java node tables

use super::Grammar;

const JAVA_SEMANTIC_NODES: &[&str] = &[
    "class_declaration",
    "method_declaration",
    "constructor_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "import_declaration",
];

const JAVA_CONTAINER_NODES: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

pub fn grammar() -> Grammar {
    Grammar::tree_sitter(
        "java",
        tree_sitter_java::LANGUAGE.into(),
        JAVA_SEMANTIC_NODES,
        JAVA_CONTAINER_NODES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_exist_in_grammar() {
        let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
        for kind in JAVA_SEMANTIC_NODES {
            assert_ne!(language.id_for_node_kind(kind, true), 0, "{}", kind);
        }
    }
}
