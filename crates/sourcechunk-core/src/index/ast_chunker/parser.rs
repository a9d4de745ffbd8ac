//! Parser capability and the tree-sitter adapter
//!
//! The extractor only sees [`SyntaxTree`]: a flat arena of nodes carrying
//! kind, field name, byte range, row range and parent/children links. Each
//! grammar supplies a [`SyntaxParser`] that produces one.

use crate::error::{Error, Result};
use std::ops::Range;
use tree_sitter::{Language as TsLanguage, Parser};

/// Index of a node inside its [`SyntaxTree`]
pub type NodeId = usize;

/// One node of a parsed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: &'static str,
    /// Field name this node occupies in its parent, if any
    pub field: Option<&'static str>,
    pub start_byte: usize,
    pub end_byte: usize,
    /// 0-based row of the first byte
    pub start_row: usize,
    /// 0-based row of the last byte
    pub end_row: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Parsed file as an arena; node 0 is the root
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self.nodes[id].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn byte_range(&self, id: NodeId) -> Range<usize> {
        let node = &self.nodes[id];
        node.start_byte..node.end_byte
    }

    /// First child stored under `field`
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].field == Some(field))
    }

    /// Source text of a node; invalid UTF-8 is replaced, never rejected
    pub fn text(&self, id: NodeId, source: &[u8]) -> String {
        let range = self.byte_range(id);
        let end = range.end.min(source.len());
        let start = range.start.min(end);
        String::from_utf8_lossy(&source[start..end]).into_owned()
    }
}

/// Incremental construction of a [`SyntaxTree`] in pre-order
#[derive(Debug, Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; `parent` must already have been pushed
    pub fn push(
        &mut self,
        parent: Option<NodeId>,
        kind: &'static str,
        field: Option<&'static str>,
        bytes: Range<usize>,
        rows: Range<usize>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SyntaxNode {
            kind,
            field,
            start_byte: bytes.start,
            end_byte: bytes.end,
            start_row: rows.start,
            end_row: rows.end,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}

/// Narrow parsing capability implemented once per supported language
pub trait SyntaxParser: Send + Sync {
    fn parse(&self, source: &[u8]) -> Result<SyntaxTree>;
}

/// [`SyntaxParser`] backed by a tree-sitter grammar
pub struct TreeSitterParser {
    language: TsLanguage,
}

impl TreeSitterParser {
    pub fn new(language: TsLanguage) -> Self {
        Self { language }
    }
}

impl SyntaxParser for TreeSitterParser {
    fn parse(&self, source: &[u8]) -> Result<SyntaxTree> {
        // tree_sitter::Parser is not Sync, so one is built per call
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| parse_error(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| parse_error("parser returned no tree".to_string()))?;
        Ok(convert_tree(&tree))
    }
}

fn parse_error(reason: String) -> Error {
    Error::ParseUnavailable {
        language: "tree-sitter".to_string(),
        reason,
    }
}

/// Copy a tree-sitter tree into the arena without recursion
fn convert_tree(tree: &tree_sitter::Tree) -> SyntaxTree {
    let mut builder = SyntaxTreeBuilder::new();
    let mut cursor = tree.walk();
    let mut ancestors: Vec<NodeId> = Vec::new();

    loop {
        let node = cursor.node();
        let id = builder.push(
            ancestors.last().copied(),
            node.kind(),
            cursor.field_name(),
            node.start_byte()..node.end_byte(),
            node.start_position().row..node.end_position().row,
        );

        if cursor.goto_first_child() {
            ancestors.push(id);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return builder.finish();
            }
            ancestors.pop();
        }
    }
}
