// tests/render_tests.rs
//
// Full-pipeline rendering through a no-color buffer, so the assertions see
// the plain text layer the styling is applied to.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use termcolor::Buffer;

use chroma::hooks::{HookCallback, HookOutcome, HookPoint};
use chroma::render::Highlighter;
use chroma::{RenderContext, RenderOptions};

fn render_with(ctx: &mut RenderContext, source: &str) -> String {
    let mut buf = Buffer::no_color();
    ctx.render_source(source, &RenderOptions::default(), &mut buf)
        .unwrap();
    String::from_utf8(buf.into_inner()).unwrap()
}

fn render(source: &str) -> String {
    render_with(&mut RenderContext::new(), source)
}

#[test]
fn test_heading_renders_with_top_margin() {
    assert_eq!(render("# Hello"), "\nHello\n");
}

#[test]
fn test_paragraph_renders_with_trailing_blank() {
    assert_eq!(render("plain words"), "plain words\n\n");
}

#[test]
fn test_bold_and_italic_markers_are_dropped() {
    let out = render("**bold** and *italic*");
    assert_eq!(out, "bold and italic\n\n");
}

#[test]
fn test_inline_code_content_only() {
    assert_eq!(render("run `ls -la` now"), "run ls -la now\n\n");
}

#[test]
fn test_link_renders_text_then_url() {
    assert_eq!(render("[rust](https://rust-lang.org)"), "rust (https://rust-lang.org)\n\n");
}

#[test]
fn test_bullet_and_checkbox_glyphs() {
    assert_eq!(render("- item"), "\u{2022} item\n");
    assert_eq!(render("- [x] done"), "[\u{2713}] done\n");
    assert_eq!(render("- [ ] todo"), "[ ] todo\n");
}

#[test]
fn test_nested_list_indentation() {
    assert_eq!(render("  - sub"), "  \u{2022} sub\n");
}

#[test]
fn test_ordered_list_labels() {
    assert_eq!(render("1. first\n2. second"), "1. first\n2. second\n");
}

#[test]
fn test_blockquote_bar() {
    assert_eq!(render("> wisdom"), "\u{2502} wisdom\n");
}

#[test]
fn test_hr_spans_configured_width() {
    let mut ctx = RenderContext::new().with_width(10);
    let out = render_with(&mut ctx, "---");
    assert_eq!(out, format!("{}\n", "\u{2500}".repeat(10)));
}

#[test]
fn test_code_block_content_is_verbatim() {
    let out = render("```python\nprint(1)\n```");
    assert!(out.contains("print(1)\n"));
}

#[test]
fn test_table_has_exactly_one_separator_after_header() {
    let out = render("| a | b |\n|---|---|\n| 1 | 2 |");
    let borders: Vec<&str> = out.lines().filter(|l| l.starts_with('+')).collect();
    // Top, post-header, and bottom.
    assert_eq!(borders.len(), 3);
    assert!(borders.iter().all(|b| *b == borders[0]));
}

#[test]
fn test_table_column_width_floor() {
    let out = render("| a |\n|---|\n| b |");
    // One-character cells still get three columns of content space.
    assert!(out.contains("| a   |"), "got:\n{out}");
    assert!(out.contains("+-----+"), "got:\n{out}");
}

#[test]
fn test_table_right_alignment_pads_left() {
    let out = render("| head | h |\n| ---: |---|\n| x | y |");
    assert!(out.contains("|    x |"), "got:\n{out}");
}

#[test]
fn test_transform_hook_applies_to_text() {
    let mut ctx = RenderContext::new();
    let upper = HookCallback::transform(|s| s.to_uppercase());
    ctx.hooks
        .hook(HookPoint::TransformContent, upper.clone())
        .unwrap();
    assert_eq!(render_with(&mut ctx, "hello"), "HELLO\n\n");

    // After unhook the text passes through untouched.
    assert!(ctx.hooks.unhook(HookPoint::TransformContent, &upper));
    assert_eq!(render_with(&mut ctx, "hello"), "hello\n\n");
}

#[test]
fn test_transform_hook_does_not_touch_code() {
    let mut ctx = RenderContext::new();
    ctx.hooks
        .hook(
            HookPoint::TransformContent,
            HookCallback::transform(|s| s.to_uppercase()),
        )
        .unwrap();
    let out = render_with(&mut ctx, "```\nkeep lower\n```");
    assert!(out.contains("keep lower"));
}

#[test]
fn test_render_override_suppresses_default() {
    let mut ctx = RenderContext::new();
    let override_hook = HookCallback::render(|_, out| {
        write!(out, "<<heading>>")?;
        Ok(HookOutcome::Handled)
    });
    ctx.hooks
        .hook(HookPoint::RenderHeading, override_hook.clone())
        .unwrap();
    assert_eq!(render_with(&mut ctx, "# Hi"), "<<heading>>");

    assert!(ctx.hooks.unhook(HookPoint::RenderHeading, &override_hook));
    assert_eq!(render_with(&mut ctx, "# Hi"), "\nHi\n");
}

#[test]
fn test_not_handled_override_keeps_default() {
    let mut ctx = RenderContext::new();
    ctx.hooks
        .hook(
            HookPoint::RenderHr,
            HookCallback::render(|_, out| {
                write!(out, "[hr coming] ")?;
                Ok(HookOutcome::NotHandled)
            }),
        )
        .unwrap();
    let mut ctx = ctx.with_width(4);
    let out = render_with(&mut ctx, "---");
    assert_eq!(out, format!("[hr coming] {}\n", "\u{2500}".repeat(4)));
}

#[test]
fn test_notify_hooks_observe_every_block() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut ctx = RenderContext::new();
    ctx.hooks
        .hook(
            HookPoint::PreLine,
            HookCallback::notify(move |node| log.borrow_mut().push(node.tag().to_string())),
        )
        .unwrap();
    render_with(&mut ctx, "# T\n\npara");
    assert_eq!(*seen.borrow(), vec!["heading", "blank", "paragraph"]);
}

#[test]
fn test_external_highlighter_wins_for_known_lang() {
    struct Caps;
    impl Highlighter for Caps {
        fn highlight(&self, text: &str, lang: &str) -> Option<String> {
            (lang == "python").then(|| text.to_uppercase())
        }
    }
    let mut ctx = RenderContext::new().with_highlighter(Box::new(Caps));
    let out = render_with(&mut ctx, "```python\nprint(1)\n```");
    assert!(out.contains("PRINT(1)"), "got:\n{out}");

    // Declined language falls back to the built-in colorizer, verbatim text.
    let out = render_with(&mut ctx, "```rust\nfn main() {}\n```");
    assert!(out.contains("fn main() {}"), "got:\n{out}");
}

#[test]
fn test_untagged_code_block_is_classified() {
    // No fence language, but the shebang pins it to shell; content must
    // still come through byte-for-byte under no-color output.
    let out = render("```\n#!/bin/bash\necho hi\n```");
    assert!(out.contains("#!/bin/bash\n"));
    assert!(out.contains("echo hi\n"));
}

#[test]
fn test_unterminated_fence_renders_as_text() {
    let out = render("```rust\nfn main() {}");
    assert!(out.contains("fn main() {}"));
}

#[test]
fn test_json_format_pretty_prints() {
    let mut ctx = RenderContext::new();
    let mut buf = Buffer::no_color();
    let opts = RenderOptions {
        format: Some("json".to_string()),
        ..Default::default()
    };
    ctx.render_source("{\"a\":1}", &opts, &mut buf).unwrap();
    let out = String::from_utf8(buf.into_inner()).unwrap();
    assert!(out.contains("\"a\": 1"), "got:\n{out}");
}

#[test]
fn test_text_format_is_passthrough() {
    let mut ctx = RenderContext::new();
    let mut buf = Buffer::no_color();
    let opts = RenderOptions {
        format: Some("text".to_string()),
        ..Default::default()
    };
    ctx.render_source("# not a heading", &opts, &mut buf).unwrap();
    let out = String::from_utf8(buf.into_inner()).unwrap();
    assert!(out.contains("# not a heading"));
}
