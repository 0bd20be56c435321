// tests/theme_tests.rs

use termcolor::{Buffer, Color};

use chroma::errors::ChromaError;
use chroma::theme::{Style, ThemeEngine, ThemeProvider, TokenKey};
use chroma::{RenderContext, RenderOptions};

#[test]
fn test_default_theme_is_active() {
    let themes = ThemeEngine::new();
    assert_eq!(themes.active_name(), "default");
}

#[test]
fn test_switch_to_builtin_theme() {
    let mut themes = ThemeEngine::new();
    themes.switch("mono").unwrap();
    assert_eq!(themes.active_name(), "mono");
    themes.switch("solarized").unwrap();
    assert_eq!(themes.active_name(), "solarized");
}

#[test]
fn test_unknown_theme_leaves_active_untouched() {
    let mut themes = ThemeEngine::new();
    themes.switch("mono").unwrap();
    let err = themes.switch("neon").unwrap_err();
    match err {
        ChromaError::UnknownTheme { name, available } => {
            assert_eq!(name, "neon");
            assert!(available.contains("default"));
        }
        other => panic!("expected unknown theme error, got {other:?}"),
    }
    assert_eq!(themes.active_name(), "mono");
}

#[test]
fn test_list_themes_includes_builtins() {
    let themes = ThemeEngine::new();
    let names = themes.list_themes();
    for expected in ["default", "mono", "solarized"] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
}

#[test]
fn test_resolution_is_total() {
    let themes = ThemeEngine::new();
    // Out-of-range heading level resolves to a neutral style, not a panic.
    let style = themes.resolve(TokenKey::Heading(9));
    assert_eq!(style, Style::plain());
}

struct OceanProvider {
    active: bool,
}

impl ThemeProvider for OceanProvider {
    fn switch_theme(&mut self, name: &str) -> bool {
        if name == "ocean" {
            self.active = true;
            true
        } else {
            self.active = false;
            false
        }
    }

    fn list_themes(&self) -> Vec<String> {
        vec!["ocean".to_string()]
    }

    fn resolve(&self, key: TokenKey) -> Option<Style> {
        match key {
            TokenKey::Text if self.active => Some(Style::fg(Color::Cyan)),
            _ => None,
        }
    }
}

#[test]
fn test_provider_is_offered_the_switch_first() {
    let mut themes = ThemeEngine::with_provider(Box::new(OceanProvider { active: false }));
    themes.switch("ocean").unwrap();
    assert_eq!(themes.active_name(), "ocean");
    assert_eq!(themes.resolve(TokenKey::Text), Style::fg(Color::Cyan));
}

#[test]
fn test_provider_decline_falls_back_to_builtins() {
    let mut themes = ThemeEngine::with_provider(Box::new(OceanProvider { active: false }));
    themes.switch("mono").unwrap();
    assert_eq!(themes.active_name(), "mono");
}

#[test]
fn test_provider_resolution_falls_through_on_none() {
    let mut themes = ThemeEngine::with_provider(Box::new(OceanProvider { active: false }));
    themes.switch("ocean").unwrap();
    // The provider only styles Text; everything else uses the built-in
    // palette underneath.
    let style = themes.resolve(TokenKey::QuoteBar);
    assert_eq!(style, Style::fg(Color::Magenta));
}

#[test]
fn test_provider_themes_appear_in_listing() {
    let themes = ThemeEngine::with_provider(Box::new(OceanProvider { active: false }));
    assert!(themes.list_themes().contains(&"ocean".to_string()));
}

#[test]
fn test_render_options_theme_switch() {
    let mut ctx = RenderContext::new();
    let mut buf = Buffer::no_color();
    let opts = RenderOptions {
        theme: Some("mono".to_string()),
        ..Default::default()
    };
    ctx.render_source("hi", &opts, &mut buf).unwrap();
    assert_eq!(ctx.themes.active_name(), "mono");
}

#[test]
fn test_render_options_unknown_theme_aborts_render() {
    let mut ctx = RenderContext::new();
    let mut buf = Buffer::no_color();
    let opts = RenderOptions {
        theme: Some("neon".to_string()),
        ..Default::default()
    };
    let err = ctx.render_source("hi", &opts, &mut buf).unwrap_err();
    assert!(matches!(err, ChromaError::UnknownTheme { .. }));
    assert_eq!(ctx.themes.active_name(), "default");
    assert!(buf.into_inner().is_empty());
}
