//! Render context and dispatch.
//!
//! [`RenderContext`] is the explicit, injectable home for everything the
//! pipeline needs: the active palette, both registries, and the optional
//! external collaborators. It is constructed once at the entrypoint and
//! passed by reference through parse and render; there is no ambient global
//! state.
//!
//! Concurrency: the pipeline is single-threaded and synchronous. Dispatch
//! takes `&mut self` only for the optional theme switch, then reborrows
//! immutably for the render walk, so a mid-render theme switch through the
//! same context is unrepresentable. The design assumes one invocation at a
//! time; callers extending to renderer-per-thread must give each thread its
//! own context.

use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::errors::ChromaError;
use crate::formats;
use crate::hooks::HookRegistry;
use crate::registry::ParserRegistry;
use crate::render::Highlighter;
use crate::theme::{ThemeEngine, ThemeProvider};

/// Per-invocation knobs supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Explicit format override; wins over all detection.
    pub format: Option<String>,
    /// Filename hint for extension-based detection.
    pub filename: Option<String>,
    /// Theme to activate before rendering.
    pub theme: Option<String>,
}

/// Process-lifetime rendering state: palette, registries, collaborators.
pub struct RenderContext {
    pub themes: ThemeEngine,
    pub parsers: ParserRegistry,
    pub hooks: HookRegistry,
    /// Optional external syntax highlighter, resolved once at startup.
    pub highlighter: Option<Box<dyn Highlighter>>,
    /// Content width used for horizontal rules.
    pub width: usize,
}

impl RenderContext {
    /// Builds a context with built-in palettes and formats and no external
    /// collaborators.
    pub fn new() -> Self {
        let mut parsers = ParserRegistry::new();
        formats::register_builtin_formats(&mut parsers);
        Self {
            themes: ThemeEngine::new(),
            parsers,
            hooks: HookRegistry::new(),
            highlighter: None,
            width: 80,
        }
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn with_theme_provider(mut self, provider: Box<dyn ThemeProvider>) -> Self {
        self.themes = ThemeEngine::with_provider(provider);
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders `source` to `out`, selecting the parser by detected or
    /// explicit format.
    ///
    /// A requested theme is switched first; on an unknown theme the error
    /// propagates and the active palette is left unchanged.
    pub fn render_source(
        &mut self,
        source: &str,
        opts: &RenderOptions,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError> {
        if let Some(theme) = &opts.theme {
            self.themes.switch(theme)?;
        }
        let format = self.parsers.detect_format(
            opts.format.as_deref(),
            opts.filename.as_deref(),
            Some(source),
        )?;
        let renderer = self
            .parsers
            .get(&format)
            .ok_or_else(|| ChromaError::UnknownFormat {
                name: format.clone(),
                available: self.parsers.list().join(", "),
            })?;
        renderer.render(source, self, out)
    }

    /// Convenience entrypoint writing to stdout, with color only when
    /// stdout is a terminal.
    pub fn render_to_stdout(
        &mut self,
        source: &str,
        opts: &RenderOptions,
    ) -> Result<(), ChromaError> {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.render_source(source, opts, &mut stdout)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
