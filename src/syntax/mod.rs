//! Concrete syntax tree types and the block/inline parsers.
//!
//! All nodes carry a [`Position`] and the exact originating source text, so
//! callers can map any rendered construct back to its input lines. The parser
//! is purely syntactic: no format detection, no theming, no rendering.

use serde::Serialize;

pub mod block;
pub mod inline;
pub mod node;

pub use block::parse;
pub use inline::parse_inline;
pub use node::{Node, NodeKind};

/// Source location of a node.
///
/// `line` and `column` are 1-based; `end_column` is one past the last column
/// the node occupies on its starting line. `offset` is the byte offset of the
/// node's first line within the full source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, end_column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            end_column,
            offset,
        }
    }
}

/// Column alignment of one table column, taken from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Whether a table row renders as the header or as body content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowType {
    Header,
    Body,
}
