//! Built-in format renderers.
//!
//! Markdown runs the full CST pipeline; json and toml get lightweight
//! token-colorized treatments; text passes through. All built-ins are
//! registered at context construction and can also be resolved by handler
//! name through [`crate::registry::ParserRegistry::register_named`].

use std::io::Write;
use std::rc::Rc;

use termcolor::WriteColor;

use crate::engine::RenderContext;
use crate::errors::ChromaError;
use crate::registry::{FormatRenderer, ParserRegistry};
use crate::render::{highlight, Renderer};
use crate::syntax::{self, NodeKind};
use crate::theme::TokenKey;

/// The full markdown pipeline: parse to a CST, then walk it.
pub struct MarkdownFormat;

impl FormatRenderer for MarkdownFormat {
    fn render(
        &self,
        source: &str,
        ctx: &RenderContext,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError> {
        let doc = syntax::parse(source);
        Renderer::new(ctx).render(&doc, out)?;
        Ok(())
    }

    fn self_check(&self) -> Result<(), String> {
        let doc = syntax::parse("# ok");
        match doc.children.first().map(|n| &n.kind) {
            Some(NodeKind::Heading { level: 1 }) => Ok(()),
            other => Err(format!("heading probe parsed as {other:?}")),
        }
    }
}

/// Pretty-prints valid JSON with token colors; invalid JSON passes through
/// unchanged rather than erroring.
pub struct JsonFormat;

impl FormatRenderer for JsonFormat {
    fn render(
        &self,
        source: &str,
        ctx: &RenderContext,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError> {
        match serde_json::from_str::<serde_json::Value>(source) {
            Ok(value) => {
                let pretty = serde_json::to_string_pretty(&value)
                    .unwrap_or_else(|_| source.to_string());
                highlight::colorize(out, &ctx.themes, &pretty, "json")?;
            }
            Err(_) => {
                write!(out, "{source}")?;
            }
        }
        Ok(())
    }

    fn self_check(&self) -> Result<(), String> {
        serde_json::from_str::<serde_json::Value>("{\"probe\":true}")
            .map(|_| ())
            .map_err(|e| format!("json probe failed: {e}"))
    }
}

/// Line colorizer for toml: sections, keys, and comments get distinct
/// tokens. No toml validation is attempted.
pub struct TomlFormat;

impl FormatRenderer for TomlFormat {
    fn render(
        &self,
        source: &str,
        ctx: &RenderContext,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError> {
        for line in source.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                put(out, ctx, TokenKey::CodeComment, line)?;
            } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                put(out, ctx, TokenKey::Heading(2), line)?;
            } else if let Some(eq) = line.find('=') {
                put(out, ctx, TokenKey::CodeKeyword, &line[..eq])?;
                put(out, ctx, TokenKey::Text, "=")?;
                put(out, ctx, TokenKey::CodeString, &line[eq + 1..])?;
            } else {
                put(out, ctx, TokenKey::Text, line)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Unstyled passthrough for plain text inputs.
pub struct TextFormat;

impl FormatRenderer for TextFormat {
    fn render(
        &self,
        source: &str,
        _ctx: &RenderContext,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError> {
        write!(out, "{source}")?;
        Ok(())
    }
}

fn put(
    out: &mut dyn WriteColor,
    ctx: &RenderContext,
    key: TokenKey,
    text: &str,
) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    out.set_color(&ctx.themes.resolve(key).to_spec())?;
    write!(out, "{text}")?;
    out.reset()
}

// ============================================================================
// HANDLER TABLE
// ============================================================================

/// Resolves a built-in handler name to a renderer, its extension bindings,
/// and a description. `None` means the handler does not exist; name-based
/// registration must fail in that case.
pub fn builtin_handler(
    name: &str,
) -> Option<(Rc<dyn FormatRenderer>, Vec<String>, String)> {
    let (renderer, extensions, description): (Rc<dyn FormatRenderer>, &[&str], &str) = match name {
        "markdown" => (
            Rc::new(MarkdownFormat),
            &["md", "markdown", "mdown"],
            "Markdown rendered through the semantic-token CST pipeline",
        ),
        "json" => (
            Rc::new(JsonFormat),
            &["json"],
            "JSON pretty-printed with token colors",
        ),
        "toml" => (
            Rc::new(TomlFormat),
            &["toml"],
            "TOML with section/key/comment coloring",
        ),
        "text" => (
            Rc::new(TextFormat),
            &["txt", "text", "log"],
            "Plain text passthrough",
        ),
        _ => return None,
    };
    Some((
        renderer,
        extensions.iter().map(|e| e.to_string()).collect(),
        description.to_string(),
    ))
}

/// Registers every built-in format. Called once at context construction.
pub fn register_builtin_formats(registry: &mut ParserRegistry) {
    for name in ["markdown", "json", "toml", "text"] {
        if let Some((renderer, extensions, description)) = builtin_handler(name) {
            let ext_refs: Vec<&str> = extensions.iter().map(String::as_str).collect();
            registry.register(name, renderer, &ext_refs, &description);
        }
    }
}
