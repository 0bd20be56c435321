//! Chroma CST Renderer
//!
//! Walks the tree produced by the parser, resolves each node's semantic
//! token against the active palette, and writes styled text. Hook points
//! are consulted before default rendering: a `Handled` outcome from an
//! override hook suppresses the default for that node, and content
//! transforms apply to textual content just before display.

use std::io::{self, Write};

use termcolor::WriteColor;

use crate::classify::classify;
use crate::engine::RenderContext;
use crate::hooks::HookPoint;
use crate::syntax::{Node, NodeKind};
use crate::theme::{Style, TokenKey};

pub mod highlight;
pub mod table;

pub use highlight::Highlighter;

/// Tree-walking renderer. Borrows the context immutably: rendering never
/// mutates the palette or the registries.
pub struct Renderer<'a> {
    ctx: &'a RenderContext,
}

impl<'a> Renderer<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    /// Renders a document tree to `out`.
    pub fn render(&self, doc: &Node, out: &mut dyn WriteColor) -> io::Result<()> {
        self.ctx.hooks.notify(HookPoint::PreRender, doc);
        // Ordered-list numbering runs across contiguous ordered items and
        // resets at any other block except blank lines.
        let mut ordered_counter = 0u32;
        for child in &doc.children {
            self.ctx.hooks.notify(HookPoint::PreLine, child);
            self.render_block(child, &mut ordered_counter, out)?;
            self.ctx.hooks.notify(HookPoint::PostLine, child);
        }
        self.ctx.hooks.notify(HookPoint::PostRender, doc);
        Ok(())
    }

    fn render_block(
        &self,
        node: &Node,
        ordered_counter: &mut u32,
        out: &mut dyn WriteColor,
    ) -> io::Result<()> {
        match &node.kind {
            NodeKind::ListItem { ordered: true, .. } | NodeKind::Blank => {}
            _ => *ordered_counter = 0,
        }

        match &node.kind {
            NodeKind::Document => {
                let mut counter = 0u32;
                for child in &node.children {
                    self.render_block(child, &mut counter, out)?;
                }
                Ok(())
            }

            NodeKind::Heading { level } => {
                if self.ctx.hooks.run(HookPoint::RenderHeading, node, out)?.handled() {
                    return Ok(());
                }
                writeln!(out)?;
                let mut style = self.ctx.themes.resolve(TokenKey::Heading(*level));
                style.bold = true;
                self.render_inline(&node.children, style, out)?;
                writeln!(out)
            }

            NodeKind::Paragraph => {
                let style = self.ctx.themes.resolve(TokenKey::Text);
                self.render_inline(&node.children, style, out)?;
                writeln!(out)?;
                writeln!(out)
            }

            NodeKind::CodeBlock { lang, content, .. } => {
                if self.ctx.hooks.run(HookPoint::RenderCode, node, out)?.handled() {
                    return Ok(());
                }
                self.render_code(lang.as_deref(), content, out)
            }

            NodeKind::ListItem {
                ordered,
                number,
                indent,
                checked,
            } => {
                if self.ctx.hooks.run(HookPoint::RenderList, node, out)?.handled() {
                    return Ok(());
                }
                write!(out, "{}", "  ".repeat(*indent))?;
                if let Some(done) = checked {
                    let glyph = if *done { "[\u{2713}] " } else { "[ ] " };
                    self.write_styled(out, self.ctx.themes.resolve(TokenKey::Checkbox), glyph)?;
                } else if *ordered {
                    let label = number.unwrap_or(*ordered_counter + 1);
                    *ordered_counter = label;
                    let text = format!("{label}. ");
                    self.write_styled(out, self.ctx.themes.resolve(TokenKey::ListNumber), &text)?;
                } else {
                    self.write_styled(
                        out,
                        self.ctx.themes.resolve(TokenKey::Bullet),
                        "\u{2022} ",
                    )?;
                }
                let style = self.ctx.themes.resolve(TokenKey::Text);
                self.render_inline(&node.children, style, out)?;
                writeln!(out)
            }

            NodeKind::Blockquote => {
                if self.ctx.hooks.run(HookPoint::RenderQuote, node, out)?.handled() {
                    return Ok(());
                }
                self.write_styled(
                    out,
                    self.ctx.themes.resolve(TokenKey::QuoteBar),
                    "\u{2502} ",
                )?;
                let style = self.ctx.themes.resolve(TokenKey::QuoteText);
                self.render_inline(&node.children, style, out)?;
                writeln!(out)
            }

            NodeKind::Table { .. } => {
                if self.ctx.hooks.run(HookPoint::RenderTable, node, out)?.handled() {
                    return Ok(());
                }
                table::render_table(out, &self.ctx.themes, node)?;
                writeln!(out)
            }

            NodeKind::Hr => {
                if self.ctx.hooks.run(HookPoint::RenderHr, node, out)?.handled() {
                    return Ok(());
                }
                let rule = "\u{2500}".repeat(self.ctx.width);
                self.write_styled(out, self.ctx.themes.resolve(TokenKey::Hr), &rule)?;
                writeln!(out)
            }

            NodeKind::Blank => writeln!(out),

            // Inline kinds reaching block position render as a bare line.
            NodeKind::Text { .. }
            | NodeKind::Bold
            | NodeKind::Italic
            | NodeKind::InlineCode { .. }
            | NodeKind::Link { .. } => {
                let style = self.ctx.themes.resolve(TokenKey::Text);
                self.render_inline(std::slice::from_ref(node), style, out)?;
                writeln!(out)
            }

            // Rows and cells only occur under a table.
            NodeKind::TableRow { .. } | NodeKind::TableCell { .. } => Ok(()),

            NodeKind::Unknown { tag } => {
                let text = format!("[unknown:{tag}]");
                self.write_styled(out, self.ctx.themes.resolve(TokenKey::Diagnostic), &text)?;
                writeln!(out)
            }
        }
    }

    fn render_code(
        &self,
        lang: Option<&str>,
        content: &str,
        out: &mut dyn WriteColor,
    ) -> io::Result<()> {
        let lang_tag: Option<String> = lang
            .map(String::from)
            .or_else(|| classify(content).map(String::from));

        if let (Some(external), Some(tag)) = (&self.ctx.highlighter, &lang_tag) {
            if let Some(styled) = external.highlight(content, tag) {
                write!(out, "{styled}")?;
                return writeln!(out);
            }
        }

        highlight::colorize(out, &self.ctx.themes, content, lang_tag.as_deref().unwrap_or(""))?;
        writeln!(out)
    }

    fn render_inline(
        &self,
        children: &[Node],
        base: Style,
        out: &mut dyn WriteColor,
    ) -> io::Result<()> {
        for child in children {
            match &child.kind {
                NodeKind::Text { content } => {
                    let content = self.ctx.hooks.run_transform(content);
                    self.write_styled(out, base, &content)?;
                }
                NodeKind::Bold => {
                    let mut style = self.ctx.themes.resolve(TokenKey::Bold);
                    style.bold = true;
                    self.render_inline(&child.children, style, out)?;
                }
                NodeKind::Italic => {
                    let mut style = self.ctx.themes.resolve(TokenKey::Italic);
                    style.italic = true;
                    self.render_inline(&child.children, style, out)?;
                }
                NodeKind::InlineCode { content } => {
                    self.write_styled(
                        out,
                        self.ctx.themes.resolve(TokenKey::InlineCode),
                        content,
                    )?;
                }
                NodeKind::Link { text, url } => {
                    self.write_styled(out, self.ctx.themes.resolve(TokenKey::LinkText), text)?;
                    let trailer = format!(" ({url})");
                    self.write_styled(out, self.ctx.themes.resolve(TokenKey::LinkUrl), &trailer)?;
                }
                _ => self.render_inline(&child.children, base, out)?,
            }
        }
        Ok(())
    }

    fn write_styled(&self, out: &mut dyn WriteColor, style: Style, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        out.set_color(&style.to_spec())?;
        write!(out, "{text}")?;
        out.reset()
    }
}
