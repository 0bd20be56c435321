//! Theme selection and token resolution.
//!
//! [`ThemeEngine`] owns the active palette. An optional external
//! [`ThemeProvider`] collaborator is consulted first on a switch; when it
//! declines (or none is injected) the built-in palettes apply. Resolution
//! never fails: an unknown key falls back to a neutral style.

pub mod palette;

pub use palette::{Palette, Style, TokenKey};

use crate::errors::ChromaError;

/// Optional external theme-system collaborator. Injected once at context
/// construction, never probed per render call.
pub trait ThemeProvider {
    /// Attempt to activate `name`; `true` means the provider now owns the
    /// active theme.
    fn switch_theme(&mut self, name: &str) -> bool;
    fn list_themes(&self) -> Vec<String>;
    /// Token style under the provider's active theme, or `None` to fall
    /// through to the built-in palette.
    fn resolve(&self, key: TokenKey) -> Option<Style>;
}

/// Process-lifetime theme state: the active palette plus the optional
/// external provider.
pub struct ThemeEngine {
    active: Palette,
    external: Option<Box<dyn ThemeProvider>>,
    external_active: bool,
}

impl ThemeEngine {
    pub fn new() -> Self {
        Self {
            active: palette::builtin_default(),
            external: None,
            external_active: false,
        }
    }

    pub fn with_provider(provider: Box<dyn ThemeProvider>) -> Self {
        Self {
            active: palette::builtin_default(),
            external: Some(provider),
            external_active: false,
        }
    }

    /// Switches the active theme atomically.
    ///
    /// The external provider is offered the name first; otherwise a built-in
    /// palette is looked up. On failure the previously active palette is
    /// left untouched.
    pub fn switch(&mut self, name: &str) -> Result<(), ChromaError> {
        if let Some(provider) = &mut self.external {
            if provider.switch_theme(name) {
                self.external_active = true;
                self.active.name = name.to_string();
                return Ok(());
            }
        }
        match palette::builtin(name) {
            Some(palette) => {
                self.active = palette;
                self.external_active = false;
                Ok(())
            }
            None => Err(ChromaError::UnknownTheme {
                name: name.to_string(),
                available: self.list_themes().join(", "),
            }),
        }
    }

    /// Resolves a token against the active theme. Total: undeclared keys get
    /// a neutral style.
    pub fn resolve(&self, key: TokenKey) -> Style {
        if self.external_active {
            if let Some(provider) = &self.external {
                if let Some(style) = provider.resolve(key) {
                    return style;
                }
            }
        }
        self.active.resolve(key)
    }

    /// Built-in theme names, plus the external provider's when present.
    pub fn list_themes(&self) -> Vec<String> {
        let mut names: Vec<String> = palette::builtin_names()
            .into_iter()
            .map(String::from)
            .collect();
        if let Some(provider) = &self.external {
            for name in provider.list_themes() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn active_name(&self) -> &str {
        &self.active.name
    }
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self::new()
    }
}
