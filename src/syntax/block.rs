//! Chroma Block Parser
//!
//! Converts markup source into a CST line by line. The parser is total: it
//! never fails on malformed input. Ambiguous or unterminated constructs
//! degrade to plain paragraph/text nodes instead of erroring.
//!
//! Classification priority per line: an open fence consumes everything until
//! its closing fence; a fence-open line starts accumulation; a pipe row
//! starts or continues a table (a non-pipe line flushes it); then heading,
//! horizontal rule, blockquote, list item, indented code, blank, and finally
//! paragraph. Fence and table detection outrank the other rules because both
//! are stateful and must capture interior lines verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::syntax::inline::parse_inline;
use crate::syntax::node::{Node, NodeKind};
use crate::syntax::{Alignment, Position, RowType};

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(`{3,}|~{3,})\s*([^`\s]*)\s*$").unwrap());
static HR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap());
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}>\s?(.*)$").unwrap());
static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(?:([-*+])|(\d{1,9})[.)])\s+(?:\[([ xX])\](?:\s+|$))?(.*)$").unwrap()
});
static SEPARATOR_CELL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse markup source into a CST rooted at a `Document` node.
///
/// Total function: any input produces a document, including empty input,
/// binary garbage, and unterminated constructs.
///
/// # Examples
///
/// ```rust
/// use chroma::syntax::{parse, NodeKind};
/// let doc = parse("# Hello");
/// assert_eq!(doc.children.len(), 1);
/// assert!(matches!(doc.children[0].kind, NodeKind::Heading { level: 1 }));
/// ```
pub fn parse(source: &str) -> Node {
    let mut parser = BlockParser::new();
    let mut offset = 0usize;
    for (idx, line) in source.lines().enumerate() {
        parser.feed(idx + 1, offset, line);
        offset += line.len() + 1;
    }
    parser.finish(source)
}

// ============================================================================
// PARSER STATE
// ============================================================================

struct FenceState {
    marker: char,
    len: usize,
    lang: Option<String>,
    content: String,
    raw: String,
    start_line: usize,
    position: Position,
}

struct TableState {
    position: Position,
    raw: String,
    rows: Vec<Node>,
    alignments: Option<Vec<Alignment>>,
}

struct BlockParser {
    nodes: Vec<Node>,
    fence: Option<FenceState>,
    table: Option<TableState>,
}

impl BlockParser {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            fence: None,
            table: None,
        }
    }

    fn feed(&mut self, line_no: usize, offset: usize, line: &str) {
        if self.fence.is_some() {
            self.fence_line(line);
            return;
        }

        if let Some(caps) = FENCE_RE.captures(line) {
            self.flush_table();
            let marker_run = caps.get(1).map_or("", |m| m.as_str());
            let lang = caps
                .get(2)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            self.fence = Some(FenceState {
                marker: marker_run.chars().next().unwrap_or('`'),
                len: marker_run.chars().count(),
                lang,
                content: String::new(),
                raw: line.to_string(),
                start_line: line_no,
                position: block_position(line_no, offset, line),
            });
            return;
        }

        if is_table_line(line) {
            self.table_line(line_no, offset, line);
            return;
        }
        self.flush_table();

        if let Some(caps) = HEADING_RE.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let text = caps.get(2).map_or("", |m| m.as_str());
            let base = char_column(line, caps.get(2).map_or(0, |m| m.start()));
            let children = parse_inline(text, line_no, base, offset);
            self.nodes.push(Node::with_children(
                NodeKind::Heading { level },
                block_position(line_no, offset, line),
                line,
                children,
            ));
            return;
        }

        if HR_RE.is_match(line) {
            self.nodes.push(Node::new(
                NodeKind::Hr,
                block_position(line_no, offset, line),
                line,
            ));
            return;
        }

        if let Some(caps) = QUOTE_RE.captures(line) {
            let text = caps.get(1).map_or("", |m| m.as_str());
            let base = char_column(line, caps.get(1).map_or(0, |m| m.start()));
            let children = parse_inline(text, line_no, base, offset);
            self.nodes.push(Node::with_children(
                NodeKind::Blockquote,
                block_position(line_no, offset, line),
                line,
                children,
            ));
            return;
        }

        if let Some(caps) = LIST_RE.captures(line) {
            let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count()) / 2;
            let ordered = caps.get(3).is_some();
            let number = caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok());
            let checked = caps.get(4).map(|m| !m.as_str().trim().is_empty());
            let text = caps.get(5).map_or("", |m| m.as_str());
            let base = char_column(line, caps.get(5).map_or(0, |m| m.start()));
            let children = parse_inline(text, line_no, base, offset);
            self.nodes.push(Node::with_children(
                NodeKind::ListItem {
                    ordered,
                    number,
                    indent,
                    checked,
                },
                block_position(line_no, offset, line),
                line,
                children,
            ));
            return;
        }

        if line.starts_with("    ") && !line.trim().is_empty() {
            let mut content = line[4..].to_string();
            content.push('\n');
            self.nodes.push(Node::new(
                NodeKind::CodeBlock {
                    lang: None,
                    content,
                    start_line: line_no,
                },
                block_position(line_no, offset, line),
                line,
            ));
            return;
        }

        if line.trim().is_empty() {
            self.nodes.push(Node::new(
                NodeKind::Blank,
                block_position(line_no, offset, line),
                line,
            ));
            return;
        }

        let children = parse_inline(line, line_no, 1, offset);
        self.nodes.push(Node::with_children(
            NodeKind::Paragraph,
            block_position(line_no, offset, line),
            line,
            children,
        ));
    }

    fn fence_line(&mut self, line: &str) {
        let closes = match &self.fence {
            Some(f) => {
                let t = line.trim();
                !t.is_empty() && t.chars().all(|c| c == f.marker) && t.chars().count() >= f.len
            }
            None => return,
        };
        if closes {
            if let Some(mut f) = self.fence.take() {
                f.raw.push('\n');
                f.raw.push_str(line);
                self.nodes.push(Node::new(
                    NodeKind::CodeBlock {
                        lang: f.lang,
                        content: f.content,
                        start_line: f.start_line,
                    },
                    f.position,
                    f.raw,
                ));
            }
        } else if let Some(f) = &mut self.fence {
            f.raw.push('\n');
            f.raw.push_str(line);
            f.content.push_str(line);
            f.content.push('\n');
        }
    }

    fn table_line(&mut self, line_no: usize, offset: usize, line: &str) {
        let cells = split_cells(line);
        let is_separator = !cells.is_empty()
            && cells
                .iter()
                .all(|(content, _)| SEPARATOR_CELL_RE.is_match(content));

        if let Some(table) = &mut self.table {
            table.raw.push('\n');
            table.raw.push_str(line);
            if is_separator && table.alignments.is_none() && !table.rows.is_empty() {
                table.alignments = Some(parse_alignments(&cells));
                // The header distinction only ever appears retroactively,
                // once the separator row is seen.
                if let Some(last) = table.rows.last_mut() {
                    if let NodeKind::TableRow { row_type } = &mut last.kind {
                        *row_type = RowType::Header;
                    }
                }
            } else {
                table.rows.push(make_row(line_no, offset, line, &cells));
            }
        } else {
            let row = make_row(line_no, offset, line, &cells);
            self.table = Some(TableState {
                position: block_position(line_no, offset, line),
                raw: line.to_string(),
                rows: vec![row],
                alignments: None,
            });
        }
    }

    fn flush_table(&mut self) {
        if let Some(mut table) = self.table.take() {
            let cols = table
                .rows
                .iter()
                .map(|r| r.children.len())
                .max()
                .unwrap_or(0);
            let alignments = table
                .alignments
                .take()
                .unwrap_or_else(|| vec![Alignment::Left; cols]);
            self.nodes.push(Node::with_children(
                NodeKind::Table { alignments },
                table.position,
                table.raw,
                table.rows,
            ));
        }
    }

    fn finish(mut self, source: &str) -> Node {
        // Unterminated fence at end of input: degrade to a plain paragraph
        // holding everything accumulated, fence line included.
        if let Some(f) = self.fence.take() {
            let text = Node::new(
                NodeKind::Text {
                    content: f.raw.clone(),
                },
                f.position,
                f.raw.clone(),
            );
            self.nodes.push(Node::with_children(
                NodeKind::Paragraph,
                f.position,
                f.raw,
                vec![text],
            ));
        }
        self.flush_table();

        Node::with_children(
            NodeKind::Document,
            Position::new(1, 1, 1, 0),
            source,
            self.nodes,
        )
    }
}

// ============================================================================
// LINE UTILITIES
// ============================================================================

fn is_table_line(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 2 && t.starts_with('|')
}

fn block_position(line_no: usize, offset: usize, line: &str) -> Position {
    let lead = line.chars().take_while(|c| c.is_whitespace()).count();
    Position::new(line_no, lead + 1, line.chars().count() + 1, offset)
}

/// 1-based character column of a byte offset within a line.
fn char_column(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count() + 1
}

/// Splits a pipe row into `(trimmed cell content, 1-based start column)`.
/// Outer pipes are stripped; interior empty cells are preserved.
fn split_cells(line: &str) -> Vec<(String, usize)> {
    let trimmed_start = line.len() - line.trim_start().len();
    let mut body = line.trim();
    let mut base = trimmed_start;
    if let Some(rest) = body.strip_prefix('|') {
        body = rest;
        base += 1;
    }
    if let Some(rest) = body.strip_suffix('|') {
        body = rest;
    }

    let mut cells = Vec::new();
    let mut seg_start = 0usize;
    for (i, ch) in body.char_indices() {
        if ch == '|' {
            cells.push(make_cell(line, &body[seg_start..i], base + seg_start));
            seg_start = i + 1;
        }
    }
    cells.push(make_cell(line, &body[seg_start..], base + seg_start));
    cells
}

fn make_cell(line: &str, segment: &str, segment_offset: usize) -> (String, usize) {
    let lead = segment.len() - segment.trim_start().len();
    let column = char_column(line, segment_offset + lead);
    (segment.trim().to_string(), column)
}

fn make_row(line_no: usize, offset: usize, line: &str, cells: &[(String, usize)]) -> Node {
    let children = cells
        .iter()
        .map(|(content, column)| {
            let inline = parse_inline(content, line_no, *column, offset);
            Node::with_children(
                NodeKind::TableCell {
                    content: content.clone(),
                },
                Position::new(line_no, *column, column + content.chars().count(), offset),
                content.clone(),
                inline,
            )
        })
        .collect();
    Node::with_children(
        NodeKind::TableRow {
            row_type: RowType::Body,
        },
        block_position(line_no, offset, line),
        line,
        children,
    )
}

/// Alignment defaults to left when a separator cell matches no recognized
/// pattern exactly.
fn parse_alignments(cells: &[(String, usize)]) -> Vec<Alignment> {
    cells
        .iter()
        .map(|(content, _)| {
            let starts = content.starts_with(':');
            let ends = content.ends_with(':');
            match (starts, ends) {
                (true, true) if content.chars().count() >= 2 => Alignment::Center,
                (false, true) => Alignment::Right,
                _ => Alignment::Left,
            }
        })
        .collect()
}
