//! Chroma Parser Registry
//!
//! Maps a format name to its renderer and file-extension hints, performs
//! format auto-detection, and exposes list/info/health introspection.
//!
//! Registry Invariant: the registry is process-lifetime state, constructed
//! once at the entrypoint inside [`crate::engine::RenderContext`] and passed
//! by reference through the pipeline. It is never mutated mid-render.

use std::collections::HashMap;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use termcolor::WriteColor;

use crate::engine::RenderContext;
use crate::errors::ChromaError;

static TOML_SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[^\]]+\]\s*$").unwrap());
static TOML_KEY_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][\w.-]*\s*=\s*\S").unwrap());

/// One registered format renderer. Implementations must be self-contained:
/// they receive the full context and the output stream per call.
pub trait FormatRenderer {
    fn render(
        &self,
        source: &str,
        ctx: &RenderContext,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError>;

    /// Optional self-check used by `info` health reporting.
    fn self_check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Registration record for one format.
pub struct ParserRecord {
    pub name: String,
    pub renderer: Rc<dyn FormatRenderer>,
    pub extensions: Vec<String>,
    pub description: String,
}

/// Introspection snapshot returned by [`ParserRegistry::info`].
pub struct ParserInfo {
    pub name: String,
    pub description: String,
    pub extensions: Vec<String>,
    pub health: Result<(), String>,
}

/// Format-name keyed renderer registry with extension hints and a stable
/// registration order for listing.
#[derive(Default)]
pub struct ParserRegistry {
    records: HashMap<String, ParserRecord>,
    order: Vec<String>,
    extensions: HashMap<String, String>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a renderer under `name`.
    ///
    /// Idempotent on exact re-registration (same name, same renderer
    /// identity); re-registering a different renderer under an existing name
    /// replaces the record in place, keeping its listing position.
    pub fn register(
        &mut self,
        name: &str,
        renderer: Rc<dyn FormatRenderer>,
        extensions: &[&str],
        description: &str,
    ) {
        if let Some(existing) = self.records.get(name) {
            if Rc::ptr_eq(&existing.renderer, &renderer) {
                return;
            }
            let stale: Vec<String> = self
                .extensions
                .iter()
                .filter(|(_, format)| format.as_str() == name)
                .map(|(ext, _)| ext.clone())
                .collect();
            for ext in stale {
                self.extensions.remove(&ext);
            }
        } else {
            self.order.push(name.to_string());
        }
        for ext in extensions {
            self.extensions
                .insert(ext.trim_start_matches('.').to_string(), name.to_string());
        }
        self.records.insert(
            name.to_string(),
            ParserRecord {
                name: name.to_string(),
                renderer,
                extensions: extensions.iter().map(|e| e.to_string()).collect(),
                description: description.to_string(),
            },
        );
    }

    /// Name-based registration for plugin layers that only carry strings.
    /// The handler name must resolve against the built-in constructor table;
    /// an unresolvable handler fails at registration time, not at call time.
    pub fn register_named(&mut self, name: &str, handler: &str) -> Result<(), ChromaError> {
        match crate::formats::builtin_handler(handler) {
            Some((renderer, extensions, description)) => {
                let ext_refs: Vec<&str> = extensions.iter().map(String::as_str).collect();
                self.register(name, renderer, &ext_refs, &description);
                Ok(())
            }
            None => Err(ChromaError::Registration {
                name: name.to_string(),
                reason: format!("handler '{handler}' does not exist"),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn FormatRenderer>> {
        self.records.get(name).map(|r| Rc::clone(&r.renderer))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Registered format names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Description, extension bindings, and self-check health for a format.
    pub fn info(&self, name: &str) -> Option<ParserInfo> {
        self.records.get(name).map(|record| ParserInfo {
            name: record.name.clone(),
            description: record.description.clone(),
            extensions: record.extensions.clone(),
            health: record.renderer.self_check(),
        })
    }

    /// Detects the format for an input.
    ///
    /// Priority: explicit caller override (validated against the registry) >
    /// filename extension > content sniffing > `"markdown"`.
    pub fn detect_format(
        &self,
        explicit: Option<&str>,
        filename: Option<&str>,
        content: Option<&str>,
    ) -> Result<String, ChromaError> {
        if let Some(name) = explicit {
            if self.exists(name) {
                return Ok(name.to_string());
            }
            return Err(ChromaError::UnknownFormat {
                name: name.to_string(),
                available: self.list().join(", "),
            });
        }

        if let Some(ext) = filename.and_then(|f| f.rsplit('.').next().filter(|e| *e != f)) {
            if let Some(format) = self.extensions.get(&ext.to_ascii_lowercase()) {
                return Ok(format.clone());
            }
        }

        if let Some(format) = content.and_then(sniff_content) {
            return Ok(format.to_string());
        }

        Ok("markdown".to_string())
    }
}

/// Content sniffing: a leading `[section]` or `key = value` line means toml,
/// a leading `{` or `[` means json.
fn sniff_content(content: &str) -> Option<&'static str> {
    let first = content.lines().find(|l| !l.trim().is_empty())?;
    let trimmed = first.trim();
    if TOML_SECTION_RE.is_match(trimmed) || TOML_KEY_VALUE_RE.is_match(trimmed) {
        return Some("toml");
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some("json");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_toml_section() {
        assert_eq!(sniff_content("[package]\nname = \"x\""), Some("toml"));
    }

    #[test]
    fn test_sniff_toml_key_value() {
        assert_eq!(sniff_content("name = \"x\""), Some("toml"));
    }

    #[test]
    fn test_sniff_json() {
        assert_eq!(sniff_content("  {\"a\": 1}"), Some("json"));
    }

    #[test]
    fn test_sniff_prose_is_none() {
        assert_eq!(sniff_content("# heading"), None);
    }
}
