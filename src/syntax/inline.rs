//! Chroma Inline Parser
//!
//! Scans one line's textual content left to right, attempting at each
//! position: inline code span, bold, italic, link. Everything else
//! accumulates into a plain text run, flushed as one `Text` node at the next
//! special character or end of line.
//!
//! Emphasis nests one level only: the body of a bold or italic span is kept
//! as plain text. A single marker immediately followed by a second marker is
//! bold, never italic.

use crate::syntax::node::{Node, NodeKind};
use crate::syntax::Position;

/// Parse inline spans out of `text`.
///
/// `base_column` is the 1-based column of `text` within its source line;
/// each produced node's column is `base_column` plus the consumed offset.
/// Unmatched markers are ordinary text; this function cannot fail.
pub fn parse_inline(text: &str, line: usize, base_column: usize, offset: usize) -> Vec<Node> {
    let chars: Vec<char> = text.chars().collect();
    let mut scanner = InlineScanner {
        chars: &chars,
        line,
        base_column,
        offset,
        nodes: Vec::new(),
        run_start: 0,
    };
    scanner.scan();
    scanner.nodes
}

struct InlineScanner<'a> {
    chars: &'a [char],
    line: usize,
    base_column: usize,
    offset: usize,
    nodes: Vec<Node>,
    run_start: usize,
}

impl InlineScanner<'_> {
    fn scan(&mut self) {
        let mut i = 0;
        while i < self.chars.len() {
            let advanced = match self.chars[i] {
                '`' => self.try_code(i),
                '*' | '_' => self.try_emphasis(i),
                '[' => self.try_link(i),
                _ => None,
            };
            match advanced {
                Some(next) => i = next,
                None => i += 1,
            }
        }
        self.flush_run(self.chars.len());
    }

    /// Backtick span, non-greedy to the next backtick.
    fn try_code(&mut self, i: usize) -> Option<usize> {
        let close = self.find(i + 1, '`')?;
        self.flush_run(i);
        let content: String = self.chars[i + 1..close].iter().collect();
        let raw: String = self.chars[i..=close].iter().collect();
        self.push(NodeKind::InlineCode { content }, i, close + 1, raw, vec![]);
        self.run_start = close + 1;
        Some(close + 1)
    }

    fn try_emphasis(&mut self, i: usize) -> Option<usize> {
        let marker = self.chars[i];
        let doubled = self.chars.get(i + 1) == Some(&marker);
        if doubled {
            self.try_bold(i, marker)
        } else {
            self.try_italic(i, marker)
        }
    }

    fn try_bold(&mut self, i: usize, marker: char) -> Option<usize> {
        let mut j = i + 2;
        while j + 1 < self.chars.len() {
            if self.chars[j] == marker && self.chars[j + 1] == marker {
                break;
            }
            j += 1;
        }
        if j + 1 >= self.chars.len() || j == i + 2 {
            return None;
        }
        self.flush_run(i);
        let inner = self.text_node(i + 2, j);
        let raw: String = self.chars[i..j + 2].iter().collect();
        self.push(NodeKind::Bold, i, j + 2, raw, vec![inner]);
        self.run_start = j + 2;
        Some(j + 2)
    }

    fn try_italic(&mut self, i: usize, marker: char) -> Option<usize> {
        let close = self.find(i + 1, marker)?;
        if close == i + 1 {
            return None;
        }
        self.flush_run(i);
        let inner = self.text_node(i + 1, close);
        let raw: String = self.chars[i..=close].iter().collect();
        self.push(NodeKind::Italic, i, close + 1, raw, vec![inner]);
        self.run_start = close + 1;
        Some(close + 1)
    }

    /// `[text](url)`, all on one line.
    fn try_link(&mut self, i: usize) -> Option<usize> {
        let text_close = self.find(i + 1, ']')?;
        if self.chars.get(text_close + 1) != Some(&'(') {
            return None;
        }
        let url_close = self.find(text_close + 2, ')')?;
        self.flush_run(i);
        let text: String = self.chars[i + 1..text_close].iter().collect();
        let url: String = self.chars[text_close + 2..url_close].iter().collect();
        let raw: String = self.chars[i..=url_close].iter().collect();
        self.push(NodeKind::Link { text, url }, i, url_close + 1, raw, vec![]);
        self.run_start = url_close + 1;
        Some(url_close + 1)
    }

    fn find(&self, from: usize, needle: char) -> Option<usize> {
        (from..self.chars.len()).find(|&j| self.chars[j] == needle)
    }

    fn flush_run(&mut self, end: usize) {
        if end > self.run_start {
            let node = self.text_node(self.run_start, end);
            self.nodes.push(node);
        }
        self.run_start = end;
    }

    fn text_node(&self, start: usize, end: usize) -> Node {
        let content: String = self.chars[start..end].iter().collect();
        Node::new(
            NodeKind::Text {
                content: content.clone(),
            },
            self.position(start, end),
            content,
        )
    }

    fn push(&mut self, kind: NodeKind, start: usize, end: usize, raw: String, children: Vec<Node>) {
        let node = Node::with_children(kind, self.position(start, end), raw, children);
        self.nodes.push(node);
    }

    fn position(&self, start: usize, end: usize) -> Position {
        Position::new(
            self.line,
            self.base_column + start,
            self.base_column + end,
            self.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_run() {
        let nodes = parse_inline("just words", 1, 1, 0);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0].kind, NodeKind::Text { content } if content == "just words"));
    }

    #[test]
    fn test_code_span_is_non_greedy() {
        let nodes = parse_inline("`a` and `b`", 1, 1, 0);
        assert!(matches!(&nodes[0].kind, NodeKind::InlineCode { content } if content == "a"));
        assert!(matches!(&nodes[1].kind, NodeKind::Text { content } if content == " and "));
        assert!(matches!(&nodes[2].kind, NodeKind::InlineCode { content } if content == "b"));
    }

    #[test]
    fn test_double_marker_is_bold_not_italic() {
        let nodes = parse_inline("**strong**", 1, 1, 0);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0].kind, NodeKind::Bold));
        assert!(matches!(&nodes[0].children[0].kind, NodeKind::Text { content } if content == "strong"));
    }

    #[test]
    fn test_single_marker_is_italic() {
        let nodes = parse_inline("an *em* word", 1, 1, 0);
        assert!(matches!(nodes[1].kind, NodeKind::Italic));
    }

    #[test]
    fn test_unmatched_marker_stays_text() {
        let nodes = parse_inline("2 * 3 = 6", 1, 1, 0);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0].kind, NodeKind::Text { .. }));
    }

    #[test]
    fn test_link() {
        let nodes = parse_inline("see [docs](https://example.com) here", 1, 1, 0);
        assert!(
            matches!(&nodes[1].kind, NodeKind::Link { text, url } if text == "docs" && url == "https://example.com")
        );
    }

    #[test]
    fn test_bracket_without_url_is_text() {
        let nodes = parse_inline("[not a link]", 1, 1, 0);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0].kind, NodeKind::Text { .. }));
    }

    #[test]
    fn test_columns_are_relative_to_base() {
        let nodes = parse_inline("ab `c`", 1, 5, 0);
        assert_eq!(nodes[0].position.column, 5);
        assert_eq!(nodes[1].position.column, 8);
    }
}
