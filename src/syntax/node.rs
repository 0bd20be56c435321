//! The CST node type.
//!
//! One struct for the shared fields (position, raw text, children) and a sum
//! type for the per-kind payload, so the renderer's dispatch is checked for
//! exhaustiveness by the compiler.

use serde::Serialize;

use crate::syntax::{Alignment, Position, RowType};

/// A single node in the concrete syntax tree.
///
/// `raw` holds the exact source substring the node was built from. The tree
/// is constructed once by the parser and never mutated afterwards; the
/// renderer only reads it.
///
/// # Examples
///
/// ```rust
/// use chroma::syntax::{parse, NodeKind};
/// let doc = parse("# Hello");
/// assert!(matches!(doc.kind, NodeKind::Document));
/// assert!(matches!(doc.children[0].kind, NodeKind::Heading { level: 1 }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Position,
    pub raw: String,
    pub children: Vec<Node>,
}

/// The per-kind payload of a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    CodeBlock {
        lang: Option<String>,
        content: String,
        start_line: usize,
    },
    ListItem {
        ordered: bool,
        number: Option<u32>,
        indent: usize,
        checked: Option<bool>,
    },
    Blockquote,
    /// Rows are held in `children` as `TableRow` nodes, in source order.
    Table {
        alignments: Vec<Alignment>,
    },
    TableRow {
        row_type: RowType,
    },
    TableCell {
        content: String,
    },
    Hr,
    Blank,
    Text {
        content: String,
    },
    Bold,
    Italic,
    InlineCode {
        content: String,
    },
    Link {
        text: String,
        url: String,
    },
    Unknown {
        tag: String,
    },
}

impl Node {
    pub fn new(kind: NodeKind, position: Position, raw: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            raw: raw.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(
        kind: NodeKind,
        position: Position,
        raw: impl Into<String>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            kind,
            position,
            raw: raw.into(),
            children,
        }
    }

    /// Stable lowercase tag for this node kind, used in diagnostics and the
    /// unknown-node placeholder.
    pub fn tag(&self) -> &'static str {
        match &self.kind {
            NodeKind::Document => "document",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::CodeBlock { .. } => "code_block",
            NodeKind::ListItem { .. } => "list_item",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Table { .. } => "table",
            NodeKind::TableRow { .. } => "table_row",
            NodeKind::TableCell { .. } => "table_cell",
            NodeKind::Hr => "hr",
            NodeKind::Blank => "blank",
            NodeKind::Text { .. } => "text",
            NodeKind::Bold => "bold",
            NodeKind::Italic => "italic",
            NodeKind::InlineCode { .. } => "inline_code",
            NodeKind::Link { .. } => "link",
            NodeKind::Unknown { .. } => "unknown",
        }
    }

    /// Concatenated unstyled text of this node's inline content.
    ///
    /// Markers are dropped: `**bold**` contributes `bold`. Used for table
    /// column measurement, where only the displayed width matters.
    pub fn plain_text(&self) -> String {
        match &self.kind {
            NodeKind::Text { content } | NodeKind::InlineCode { content } => content.clone(),
            NodeKind::Link { text, .. } => text.clone(),
            NodeKind::TableCell { content } if self.children.is_empty() => content.clone(),
            _ => self
                .children
                .iter()
                .map(Node::plain_text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Pretty-prints the tree as an indented outline, one node per line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chroma::syntax::parse;
    /// let doc = parse("# Hi");
    /// assert!(doc.pretty().starts_with("document"));
    /// ```
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_into(0, &mut out);
        out
    }

    fn pretty_into(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.tag());
        match &self.kind {
            NodeKind::Heading { level } => out.push_str(&format!(" level={level}")),
            NodeKind::CodeBlock { lang, .. } => {
                out.push_str(&format!(" lang={}", lang.as_deref().unwrap_or("-")));
            }
            NodeKind::ListItem {
                ordered, checked, ..
            } => {
                out.push_str(&format!(" ordered={ordered}"));
                if let Some(c) = checked {
                    out.push_str(&format!(" checked={c}"));
                }
            }
            NodeKind::Text { content } | NodeKind::InlineCode { content } => {
                out.push_str(&format!(" {content:?}"));
            }
            NodeKind::Link { text, url } => out.push_str(&format!(" {text:?} -> {url}")),
            _ => {}
        }
        out.push('\n');
        for child in &self.children {
            child.pretty_into(depth + 1, out);
        }
    }
}
