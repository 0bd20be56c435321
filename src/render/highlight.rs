//! Code-block highlighting.
//!
//! An injected external [`Highlighter`] collaborator gets first refusal.
//! When it is absent or declines, a small built-in per-language colorizer
//! covers shell, Python, JavaScript/TypeScript, and JSON; anything else
//! passes through in the plain code-block token. Highlighting is best
//! effort and never fails a render.

use std::io::{self, Write};

use termcolor::WriteColor;

use crate::theme::{ThemeEngine, TokenKey};

/// Optional external syntax-highlighting collaborator.
///
/// `highlight` returns already-styled text (escape codes included) or `None`
/// to decline, which triggers the built-in fallback.
pub trait Highlighter {
    fn highlight(&self, text: &str, lang: &str) -> Option<String>;
}

const SHELL_KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "function", "local", "return", "export", "exit", "echo", "read", "shift",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "class", "import", "from", "return", "if", "elif", "else", "for", "while", "in",
    "not", "and", "or", "try", "except", "finally", "with", "as", "lambda", "yield", "pass",
    "raise", "global", "assert", "True", "False", "None",
];

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "return", "if", "else", "for", "while", "switch", "case",
    "break", "continue", "new", "class", "extends", "import", "export", "default", "async",
    "await", "try", "catch", "throw", "typeof", "of", "in", "null", "undefined", "true", "false",
    "interface", "type",
];

struct LangProfile {
    comment: &'static str,
    keywords: &'static [&'static str],
}

enum Colorizer {
    Line(LangProfile),
    Json,
}

fn colorizer_for(lang: &str) -> Option<Colorizer> {
    match lang {
        "sh" | "bash" | "zsh" | "shell" => Some(Colorizer::Line(LangProfile {
            comment: "#",
            keywords: SHELL_KEYWORDS,
        })),
        "py" | "python" | "python3" => Some(Colorizer::Line(LangProfile {
            comment: "#",
            keywords: PYTHON_KEYWORDS,
        })),
        "js" | "jsx" | "ts" | "tsx" | "javascript" | "typescript" => {
            Some(Colorizer::Line(LangProfile {
                comment: "//",
                keywords: JAVASCRIPT_KEYWORDS,
            }))
        }
        "json" => Some(Colorizer::Json),
        _ => None,
    }
}

/// Whether the built-in colorizer recognizes `lang`.
pub fn supported(lang: &str) -> bool {
    colorizer_for(lang).is_some()
}

/// Writes `text` with the built-in colorizer for `lang`, or in the plain
/// code-block token when the language is unrecognized.
pub fn colorize(
    out: &mut dyn WriteColor,
    themes: &ThemeEngine,
    text: &str,
    lang: &str,
) -> io::Result<()> {
    match colorizer_for(lang) {
        Some(Colorizer::Line(profile)) => {
            for line in text.lines() {
                colorize_line(out, themes, line, &profile)?;
                writeln!(out)?;
            }
            Ok(())
        }
        Some(Colorizer::Json) => {
            for line in text.lines() {
                colorize_json_line(out, themes, line)?;
                writeln!(out)?;
            }
            Ok(())
        }
        None => {
            for line in text.lines() {
                put(out, themes, TokenKey::CodeBlock, line)?;
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

fn put(
    out: &mut dyn WriteColor,
    themes: &ThemeEngine,
    key: TokenKey,
    text: &str,
) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    out.set_color(&themes.resolve(key).to_spec())?;
    write!(out, "{text}")?;
    out.reset()
}

fn colorize_line(
    out: &mut dyn WriteColor,
    themes: &ThemeEngine,
    line: &str,
    profile: &LangProfile,
) -> io::Result<()> {
    let chars: Vec<char> = line.chars().collect();
    let comment: Vec<char> = profile.comment.chars().collect();
    let mut run = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i..].starts_with(&comment) {
            put(out, themes, TokenKey::CodeBlock, &run)?;
            let rest: String = chars[i..].iter().collect();
            return put(out, themes, TokenKey::CodeComment, &rest);
        }

        let c = chars[i];
        if c == '"' || c == '\'' {
            put(out, themes, TokenKey::CodeBlock, &run)?;
            run = String::new();
            let (string, next) = consume_string(&chars, i, c);
            put(out, themes, TokenKey::CodeString, &string)?;
            i = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            put(out, themes, TokenKey::CodeBlock, &run)?;
            run = String::new();
            let (word, next) = consume_word(&chars, i);
            let key = if profile.keywords.contains(&word.as_str()) {
                TokenKey::CodeKeyword
            } else {
                TokenKey::CodeBlock
            };
            put(out, themes, key, &word)?;
            i = next;
            continue;
        }

        run.push(c);
        i += 1;
    }
    put(out, themes, TokenKey::CodeBlock, &run)
}

fn colorize_json_line(
    out: &mut dyn WriteColor,
    themes: &ThemeEngine,
    line: &str,
) -> io::Result<()> {
    let chars: Vec<char> = line.chars().collect();
    let mut run = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            put(out, themes, TokenKey::CodeBlock, &run)?;
            run = String::new();
            let (string, next) = consume_string(&chars, i, '"');
            // A string followed by a colon is an object key.
            let is_key = chars[next..]
                .iter()
                .find(|ch| !ch.is_whitespace())
                .is_some_and(|ch| *ch == ':');
            let key = if is_key {
                TokenKey::CodeKeyword
            } else {
                TokenKey::CodeString
            };
            put(out, themes, key, &string)?;
            i = next;
            continue;
        }

        if c.is_alphabetic() {
            put(out, themes, TokenKey::CodeBlock, &run)?;
            run = String::new();
            let (word, next) = consume_word(&chars, i);
            let key = if matches!(word.as_str(), "true" | "false" | "null") {
                TokenKey::CodeKeyword
            } else {
                TokenKey::CodeBlock
            };
            put(out, themes, key, &word)?;
            i = next;
            continue;
        }

        run.push(c);
        i += 1;
    }
    put(out, themes, TokenKey::CodeBlock, &run)
}

/// Consumes a quoted string starting at `start`, honoring backslash escapes.
/// Returns the consumed text (quotes included) and the next index.
fn consume_string(chars: &[char], start: usize, quote: char) -> (String, usize) {
    let mut s = String::new();
    s.push(chars[start]);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        s.push(c);
        i += 1;
        if c == '\\' && i < chars.len() {
            s.push(chars[i]);
            i += 1;
        } else if c == quote {
            break;
        }
    }
    (s, i)
}

fn consume_word(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    fn plain_output(text: &str, lang: &str) -> String {
        let themes = ThemeEngine::new();
        let mut buf = Buffer::no_color();
        colorize(&mut buf, &themes, text, lang).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_colorize_preserves_text() {
        let source = "def main():\n    return \"hi\"  # done\n";
        assert_eq!(plain_output(source, "python"), source);
    }

    #[test]
    fn test_unrecognized_lang_passes_through() {
        let source = "whatever <- c(1, 2)\n";
        assert_eq!(plain_output(source, "r"), source);
    }

    #[test]
    fn test_supported_aliases() {
        assert!(supported("bash"));
        assert!(supported("tsx"));
        assert!(supported("json"));
        assert!(!supported("fortran"));
    }
}
