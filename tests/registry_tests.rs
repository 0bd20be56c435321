// tests/registry_tests.rs

use std::rc::Rc;

use termcolor::{Buffer, WriteColor};

use chroma::errors::ChromaError;
use chroma::registry::{FormatRenderer, ParserRegistry};
use chroma::{RenderContext, RenderOptions};

struct StubFormat(&'static str);

impl FormatRenderer for StubFormat {
    fn render(
        &self,
        _source: &str,
        _ctx: &RenderContext,
        out: &mut dyn WriteColor,
    ) -> Result<(), ChromaError> {
        use std::io::Write;
        write!(out, "{}", self.0)?;
        Ok(())
    }
}

#[test]
fn test_builtin_formats_are_registered() {
    let ctx = RenderContext::new();
    let names = ctx.parsers.list();
    for expected in ["markdown", "json", "toml", "text"] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
}

#[test]
fn test_detection_extension_beats_sniffing() {
    let ctx = RenderContext::new();
    // Content alone would sniff as json; the extension wins.
    let format = ctx
        .parsers
        .detect_format(None, Some("config.toml"), Some("{\"a\": 1}"))
        .unwrap();
    assert_eq!(format, "toml");
}

#[test]
fn test_detection_extension_is_case_insensitive() {
    let ctx = RenderContext::new();
    let format = ctx
        .parsers
        .detect_format(None, Some("NOTES.MD"), None)
        .unwrap();
    assert_eq!(format, "markdown");
}

#[test]
fn test_detection_sniffs_json_content() {
    let ctx = RenderContext::new();
    let format = ctx
        .parsers
        .detect_format(None, None, Some("  {\"key\": true}"))
        .unwrap();
    assert_eq!(format, "json");
}

#[test]
fn test_detection_sniffs_toml_content() {
    let ctx = RenderContext::new();
    let format = ctx
        .parsers
        .detect_format(None, None, Some("[package]\nname = \"x\""))
        .unwrap();
    assert_eq!(format, "toml");
}

#[test]
fn test_detection_defaults_to_markdown() {
    let ctx = RenderContext::new();
    let format = ctx
        .parsers
        .detect_format(None, Some("README"), Some("plain prose here"))
        .unwrap();
    assert_eq!(format, "markdown");
}

#[test]
fn test_explicit_format_beats_everything() {
    let ctx = RenderContext::new();
    let format = ctx
        .parsers
        .detect_format(Some("text"), Some("x.json"), Some("{"))
        .unwrap();
    assert_eq!(format, "text");
}

#[test]
fn test_explicit_unknown_format_errors() {
    let ctx = RenderContext::new();
    let err = ctx
        .parsers
        .detect_format(Some("yaml"), None, None)
        .unwrap_err();
    match err {
        ChromaError::UnknownFormat { name, available } => {
            assert_eq!(name, "yaml");
            assert!(available.contains("markdown"));
        }
        other => panic!("expected unknown format error, got {other:?}"),
    }
}

#[test]
fn test_render_source_rejects_unknown_format() {
    let mut ctx = RenderContext::new();
    let mut buf = Buffer::no_color();
    let opts = RenderOptions {
        format: Some("docx".to_string()),
        ..Default::default()
    };
    let err = ctx.render_source("x", &opts, &mut buf).unwrap_err();
    assert!(matches!(err, ChromaError::UnknownFormat { .. }));
    // Nothing was written before the failure.
    assert!(buf.into_inner().is_empty());
}

#[test]
fn test_register_idempotent_on_same_renderer() {
    let mut registry = ParserRegistry::new();
    let stub: Rc<dyn FormatRenderer> = Rc::new(StubFormat("a"));
    registry.register("stub", Rc::clone(&stub), &["stb"], "stub format");
    registry.register("stub", Rc::clone(&stub), &["stb"], "stub format");
    assert_eq!(registry.list(), vec!["stub".to_string()]);
}

#[test]
fn test_register_replacement_clears_stale_extensions() {
    let mut registry = ParserRegistry::new();
    registry.register("stub", Rc::new(StubFormat("a")), &["old"], "first");
    registry.register("stub", Rc::new(StubFormat("b")), &["new"], "second");

    assert_eq!(registry.list(), vec!["stub".to_string()]);
    let by_new = registry.detect_format(None, Some("f.new"), None).unwrap();
    assert_eq!(by_new, "stub");
    // The stale binding must not survive the replacement.
    let by_old = registry.detect_format(None, Some("f.old"), None).unwrap();
    assert_eq!(by_old, "markdown");
}

#[test]
fn test_register_named_resolves_builtin_handler() {
    let mut registry = ParserRegistry::new();
    registry.register_named("notes", "markdown").unwrap();
    assert!(registry.exists("notes"));
    let info = registry.info("notes").unwrap();
    assert!(info.extensions.contains(&"md".to_string()));
}

#[test]
fn test_register_named_unknown_handler_fails_eagerly() {
    let mut registry = ParserRegistry::new();
    let err = registry.register_named("notes", "nonexistent").unwrap_err();
    match err {
        ChromaError::Registration { name, reason } => {
            assert_eq!(name, "notes");
            assert!(reason.contains("nonexistent"));
        }
        other => panic!("expected registration error, got {other:?}"),
    }
    assert!(!registry.exists("notes"));
}

#[test]
fn test_info_reports_health() {
    let ctx = RenderContext::new();
    for name in ["markdown", "json", "toml", "text"] {
        let info = ctx.parsers.info(name).unwrap();
        assert!(info.health.is_ok(), "{name} failed its self-check");
    }
    assert!(ctx.parsers.info("nope").is_none());
}

#[test]
fn test_custom_format_participates_in_dispatch() {
    let mut ctx = RenderContext::new();
    ctx.parsers
        .register("stub", Rc::new(StubFormat("stub output")), &["stb"], "stub");
    let mut buf = Buffer::no_color();
    let opts = RenderOptions {
        filename: Some("report.stb".to_string()),
        ..Default::default()
    };
    ctx.render_source("ignored", &opts, &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), "stub output");
}
