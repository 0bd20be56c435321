//! Semantic token palettes.
//!
//! A palette maps every [`TokenKey`] to a [`Style`]. Built-in palettes are
//! generated from one shared key list, so switching between them can never
//! surface a missing built-in token.

use std::collections::HashMap;

use termcolor::{Color, ColorSpec};

/// A semantic color token, resolved against the active palette at render
/// time. Node kinds never name concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// Heading level 1-6.
    Heading(u8),
    Text,
    Muted,
    Bold,
    Italic,
    InlineCode,
    CodeBlock,
    CodeKeyword,
    CodeString,
    CodeComment,
    Bullet,
    ListNumber,
    Checkbox,
    QuoteBar,
    QuoteText,
    LinkText,
    LinkUrl,
    TableBorder,
    TableHeader,
    Hr,
    Diagnostic,
}

/// Display style for one token: optional foreground plus attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub dim: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            fg: None,
            bold: false,
            italic: false,
            underline: false,
            dim: false,
        }
    }

    pub const fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            bold: false,
            italic: false,
            underline: false,
            dim: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Lowers this style to a termcolor spec.
    pub fn to_spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(self.fg);
        spec.set_bold(self.bold);
        spec.set_italic(self.italic);
        spec.set_underline(self.underline);
        spec.set_dimmed(self.dim);
        spec
    }
}

/// A complete token-to-style mapping. Exactly one palette is active at a
/// time; see [`crate::theme::ThemeEngine`].
#[derive(Debug, Clone)]
pub struct Palette {
    pub name: String,
    styles: HashMap<TokenKey, Style>,
}

impl Palette {
    /// Style for a token, or a neutral default when the key is undeclared.
    /// Resolution never fails a render.
    pub fn resolve(&self, key: TokenKey) -> Style {
        self.styles.get(&key).copied().unwrap_or_default()
    }

    /// The declared key set, for parity checks across palettes.
    pub fn token_keys(&self) -> std::collections::HashSet<TokenKey> {
        self.styles.keys().copied().collect()
    }
}

// ============================================================================
// BUILT-IN PALETTES
// ============================================================================

/// Names of the built-in palettes, in listing order.
pub fn builtin_names() -> Vec<&'static str> {
    vec!["default", "mono", "solarized"]
}

/// Looks up a built-in palette by name.
pub fn builtin(name: &str) -> Option<Palette> {
    match name {
        "default" => Some(build("default", default_style)),
        "mono" => Some(build("mono", mono_style)),
        "solarized" => Some(build("solarized", solarized_style)),
        _ => None,
    }
}

/// The palette active before any explicit switch.
pub fn builtin_default() -> Palette {
    build("default", default_style)
}

fn all_keys() -> Vec<TokenKey> {
    let mut keys = vec![
        TokenKey::Text,
        TokenKey::Muted,
        TokenKey::Bold,
        TokenKey::Italic,
        TokenKey::InlineCode,
        TokenKey::CodeBlock,
        TokenKey::CodeKeyword,
        TokenKey::CodeString,
        TokenKey::CodeComment,
        TokenKey::Bullet,
        TokenKey::ListNumber,
        TokenKey::Checkbox,
        TokenKey::QuoteBar,
        TokenKey::QuoteText,
        TokenKey::LinkText,
        TokenKey::LinkUrl,
        TokenKey::TableBorder,
        TokenKey::TableHeader,
        TokenKey::Hr,
        TokenKey::Diagnostic,
    ];
    for level in 1..=6 {
        keys.push(TokenKey::Heading(level));
    }
    keys
}

fn build(name: &str, style_for: impl Fn(TokenKey) -> Style) -> Palette {
    let styles = all_keys().into_iter().map(|k| (k, style_for(k))).collect();
    Palette {
        name: name.to_string(),
        styles,
    }
}

fn default_style(key: TokenKey) -> Style {
    match key {
        TokenKey::Heading(1) => Style::fg(Color::Cyan).bold().underline(),
        TokenKey::Heading(2) => Style::fg(Color::Cyan).bold(),
        TokenKey::Heading(3) => Style::fg(Color::Blue).bold(),
        TokenKey::Heading(_) => Style::fg(Color::Blue),
        TokenKey::Text => Style::plain(),
        TokenKey::Muted | TokenKey::Hr => Style::plain().dim(),
        TokenKey::Bold => Style::plain().bold(),
        TokenKey::Italic => Style::plain().italic(),
        TokenKey::InlineCode => Style::fg(Color::Yellow),
        TokenKey::CodeBlock => Style::fg(Color::Green),
        TokenKey::CodeKeyword => Style::fg(Color::Magenta),
        TokenKey::CodeString => Style::fg(Color::Green),
        TokenKey::CodeComment => Style::plain().dim(),
        TokenKey::Bullet | TokenKey::ListNumber => Style::fg(Color::Cyan),
        TokenKey::Checkbox => Style::fg(Color::Green).bold(),
        TokenKey::QuoteBar => Style::fg(Color::Magenta),
        TokenKey::QuoteText => Style::plain().italic(),
        TokenKey::LinkText => Style::fg(Color::Blue).underline(),
        TokenKey::LinkUrl => Style::fg(Color::Blue).dim(),
        TokenKey::TableBorder => Style::plain().dim(),
        TokenKey::TableHeader => Style::plain().bold(),
        TokenKey::Diagnostic => Style::fg(Color::Red).bold(),
    }
}

/// Attribute-only palette for terminals where color is unwanted.
fn mono_style(key: TokenKey) -> Style {
    match key {
        TokenKey::Heading(_) | TokenKey::Bold | TokenKey::TableHeader | TokenKey::Checkbox => {
            Style::plain().bold()
        }
        TokenKey::Italic | TokenKey::QuoteText => Style::plain().italic(),
        TokenKey::Muted
        | TokenKey::Hr
        | TokenKey::CodeComment
        | TokenKey::LinkUrl
        | TokenKey::TableBorder => Style::plain().dim(),
        TokenKey::LinkText => Style::plain().underline(),
        TokenKey::Diagnostic => Style::plain().bold().underline(),
        _ => Style::plain(),
    }
}

fn solarized_style(key: TokenKey) -> Style {
    // Solarized accents on the 256-color cube.
    let blue = Color::Ansi256(33);
    let cyan = Color::Ansi256(37);
    let green = Color::Ansi256(64);
    let yellow = Color::Ansi256(136);
    let orange = Color::Ansi256(166);
    let violet = Color::Ansi256(61);
    let red = Color::Ansi256(160);
    let base1 = Color::Ansi256(245);
    match key {
        TokenKey::Heading(1) => Style::fg(orange).bold().underline(),
        TokenKey::Heading(2) => Style::fg(orange).bold(),
        TokenKey::Heading(_) => Style::fg(yellow).bold(),
        TokenKey::Text => Style::plain(),
        TokenKey::Muted | TokenKey::Hr | TokenKey::TableBorder => Style::fg(base1).dim(),
        TokenKey::Bold => Style::plain().bold(),
        TokenKey::Italic | TokenKey::QuoteText => Style::plain().italic(),
        TokenKey::InlineCode => Style::fg(cyan),
        TokenKey::CodeBlock => Style::fg(green),
        TokenKey::CodeKeyword => Style::fg(violet),
        TokenKey::CodeString => Style::fg(cyan),
        TokenKey::CodeComment => Style::fg(base1).dim(),
        TokenKey::Bullet | TokenKey::ListNumber => Style::fg(blue),
        TokenKey::Checkbox => Style::fg(green).bold(),
        TokenKey::QuoteBar => Style::fg(violet),
        TokenKey::LinkText => Style::fg(blue).underline(),
        TokenKey::LinkUrl => Style::fg(blue).dim(),
        TokenKey::TableHeader => Style::fg(yellow).bold(),
        TokenKey::Diagnostic => Style::fg(red).bold(),
    }
}
