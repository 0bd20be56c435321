//! Bordered table layout.
//!
//! Column count comes from the alignments sequence; each column is as wide
//! as its widest displayed cell, with a floor of 3. Header rows render bold
//! in the table-header token, and exactly one separator border follows the
//! header. Widths are measured with `unicode-width` so non-ASCII cell text
//! keeps the borders aligned.

use std::io::{self, Write};

use termcolor::WriteColor;
use unicode_width::UnicodeWidthStr;

use crate::syntax::{Alignment, Node, NodeKind, RowType};
use crate::theme::{ThemeEngine, TokenKey};

const MIN_COLUMN_WIDTH: usize = 3;

pub fn render_table(
    out: &mut dyn WriteColor,
    themes: &ThemeEngine,
    node: &Node,
) -> io::Result<()> {
    let NodeKind::Table { alignments } = &node.kind else {
        return Ok(());
    };
    let rows: Vec<&Node> = node
        .children
        .iter()
        .filter(|c| matches!(c.kind, NodeKind::TableRow { .. }))
        .collect();
    if rows.is_empty() {
        return Ok(());
    }

    let widths = column_widths(alignments.len(), &rows);

    border(out, themes, &widths)?;
    for row in rows {
        let is_header = matches!(row.kind, NodeKind::TableRow { row_type: RowType::Header });
        render_row(out, themes, row, alignments, &widths, is_header)?;
        if is_header {
            border(out, themes, &widths)?;
        }
    }
    border(out, themes, &widths)
}

/// Per-column width: max(3, widest displayed cell). Missing cells in short
/// rows contribute nothing.
fn column_widths(columns: usize, rows: &[&Node]) -> Vec<usize> {
    (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.children.get(col))
                .map(|cell| cell.plain_text().width())
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

fn border(out: &mut dyn WriteColor, themes: &ThemeEngine, widths: &[usize]) -> io::Result<()> {
    out.set_color(&themes.resolve(TokenKey::TableBorder).to_spec())?;
    write!(out, "+")?;
    for width in widths {
        write!(out, "{}+", "-".repeat(width + 2))?;
    }
    out.reset()?;
    writeln!(out)
}

fn render_row(
    out: &mut dyn WriteColor,
    themes: &ThemeEngine,
    row: &Node,
    alignments: &[Alignment],
    widths: &[usize],
    is_header: bool,
) -> io::Result<()> {
    let border_spec = themes.resolve(TokenKey::TableBorder).to_spec();
    let cell_key = if is_header {
        TokenKey::TableHeader
    } else {
        TokenKey::Text
    };
    let mut cell_style = themes.resolve(cell_key);
    if is_header {
        cell_style.bold = true;
    }

    for (col, width) in widths.iter().enumerate() {
        out.set_color(&border_spec)?;
        write!(out, "|")?;
        out.reset()?;

        let content = row.children.get(col).map(Node::plain_text).unwrap_or_default();
        let alignment = alignments.get(col).copied().unwrap_or(Alignment::Left);
        let (left, right) = padding(content.width(), *width, alignment);

        write!(out, " {}", " ".repeat(left))?;
        out.set_color(&cell_style.to_spec())?;
        write!(out, "{content}")?;
        out.reset()?;
        write!(out, "{} ", " ".repeat(right))?;
    }
    out.set_color(&border_spec)?;
    write!(out, "|")?;
    out.reset()?;
    writeln!(out)
}

/// Splits the slack around a cell. For centered columns the odd space goes
/// to the right.
fn padding(content_width: usize, column_width: usize, alignment: Alignment) -> (usize, usize) {
    let slack = column_width.saturating_sub(content_width);
    match alignment {
        Alignment::Left => (0, slack),
        Alignment::Right => (slack, 0),
        Alignment::Center => (slack / 2, slack - slack / 2),
    }
}
