//! Symbol name heuristics for semantic units
//!
//! Order of preference: the node's `name` field, the name of a wrapped
//! `definition`/`declaration`, the assignment target of an anonymous
//! function, the innermost C-style `declarator`, an impl's `type`, then
//! identifier-like children and grandchildren. When nothing matches the name is `<kind>_line_<n>`.

use super::parser::{NodeId, SyntaxTree};

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "name",
    "type_identifier",
    "property_identifier",
    "field_identifier",
    "constant",
];

/// Fields that wrap the real declaration (decorators, exports)
const WRAPPER_FIELDS: &[&str] = &["definition", "declaration"];

/// Resolve a display name for `node`
///
/// `anonymous` marks function literals (arrow functions, function
/// expressions) that take the name of whatever they are assigned to.
pub fn unit_name(tree: &SyntaxTree, node: NodeId, source: &[u8], anonymous: bool) -> String {
    resolve(tree, node, source, anonymous).unwrap_or_else(|| {
        synthesized_name(tree.kind(node), tree.node(node).start_row + 1)
    })
}

/// Placeholder used when no identifier can be found
pub fn synthesized_name(kind: &str, line: usize) -> String {
    format!("{}_line_{}", kind, line)
}

fn resolve(tree: &SyntaxTree, node: NodeId, source: &[u8], anonymous: bool) -> Option<String> {
    let mut current = node;
    loop {
        if let Some(name) = field_text(tree, current, "name", source) {
            return Some(name);
        }
        match WRAPPER_FIELDS
            .iter()
            .find_map(|field| tree.child_by_field(current, field))
        {
            Some(inner) => current = inner,
            None => break,
        }
    }

    if anonymous {
        return assignment_target(tree, node, source);
    }

    if let Some(name) = declarator_name(tree, current, source) {
        return Some(name);
    }

    if let Some(name) = field_text(tree, current, "type", source) {
        return Some(name);
    }

    identifier_child(tree, current, source).or_else(|| {
        tree.children(current)
            .iter()
            .find_map(|&child| identifier_child(tree, child, source))
    })
}

/// Name of the binding an anonymous function is assigned to
fn assignment_target(tree: &SyntaxTree, node: NodeId, source: &[u8]) -> Option<String> {
    let parent = tree.parent(node)?;
    let field = match tree.kind(parent) {
        "variable_declarator" | "public_field_definition" => "name",
        "field_definition" => "property",
        "assignment_expression" => "left",
        "pair" => "key",
        _ => return None,
    };
    field_text(tree, parent, field, source)
}

/// Follow `declarator` fields down to the declared identifier
///
/// Covers C and C++ functions and typedefs, where the name sits under
/// pointer and function declarators.
fn declarator_name(tree: &SyntaxTree, node: NodeId, source: &[u8]) -> Option<String> {
    let mut current = tree.child_by_field(node, "declarator")?;
    while let Some(inner) = tree.child_by_field(current, "declarator") {
        current = inner;
    }
    clean_name(&tree.text(current, source))
}

fn field_text(tree: &SyntaxTree, node: NodeId, field: &str, source: &[u8]) -> Option<String> {
    let child = tree.child_by_field(node, field)?;
    clean_name(&tree.text(child, source))
}

fn identifier_child(tree: &SyntaxTree, node: NodeId, source: &[u8]) -> Option<String> {
    tree.children(node)
        .iter()
        .find(|&&child| IDENTIFIER_KINDS.contains(&tree.kind(child)))
        .and_then(|&child| clean_name(&tree.text(child, source)))
}

/// First line, trimmed, without surrounding quotes
fn clean_name(text: &str) -> Option<String> {
    let first = text.lines().next()?.trim();
    let cleaned = first.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
