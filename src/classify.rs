//! Heuristic language detection for fenced code without an info string.
//!
//! A shebang line wins outright; otherwise a small set of syntax signatures
//! is tried in order over the first lines of the block. Guesses feed the
//! code-block highlighter and nothing else, so a wrong guess only costs
//! colors.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of leading lines the signature pass inspects.
const SNIFF_LINES: usize = 32;

static SIGNATURES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?m)^\s*(def |class \w+[(:]|import \w|from \w+ import )").unwrap(),
            "python",
        ),
        (
            Regex::new(r"(?m)^\s*(pub fn |fn \w+\(|let mut |impl \w|use \w+::)").unwrap(),
            "rust",
        ),
        (
            Regex::new(r"(?m)(function\s+\w+\s*\(|=>\s*\{|\bconst \w+\s*=|\blet \w+\s*=)").unwrap(),
            "javascript",
        ),
        (
            Regex::new(r"(?m)(^\s*(if \[|fi$|esac$|local \w)|\$\(|\$\{\w+\}|^\w+\(\)\s*\{)").unwrap(),
            "shell",
        ),
    ]
});

/// Guess a language tag from code content.
///
/// Returns `None` when nothing matches; callers fall back to unstyled
/// passthrough.
///
/// # Examples
///
/// ```rust
/// assert_eq!(chroma::classify::classify("#!/usr/bin/env python3\nprint(1)"), Some("python"));
/// assert_eq!(chroma::classify::classify("plain prose"), None);
/// ```
pub fn classify(content: &str) -> Option<&'static str> {
    let first_line = content.lines().next().unwrap_or("");
    if let Some(lang) = from_shebang(first_line) {
        return Some(lang);
    }

    let head: String = content
        .lines()
        .take(SNIFF_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    for (signature, lang) in SIGNATURES.iter() {
        if signature.is_match(&head) {
            return Some(lang);
        }
    }

    if looks_like_json(&head) {
        return Some("json");
    }
    None
}

fn from_shebang(line: &str) -> Option<&'static str> {
    if !line.starts_with("#!") {
        return None;
    }
    if line.contains("python") {
        Some("python")
    } else if line.contains("node") {
        Some("javascript")
    } else if line.contains("ruby") {
        Some("ruby")
    } else if line.contains("bash") || line.contains("/sh") || line.contains("zsh") {
        Some("shell")
    } else {
        None
    }
}

fn looks_like_json(head: &str) -> bool {
    let trimmed = head.trim_start();
    (trimmed.starts_with('{') || trimmed.starts_with('[')) && trimmed.contains('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shebang_beats_signatures() {
        // Signature lines below would say javascript; the shebang wins.
        let content = "#!/bin/bash\nconst x = 1";
        assert_eq!(classify(content), Some("shell"));
    }

    #[test]
    fn test_python_signature() {
        assert_eq!(classify("import os\n\ndef main():\n    pass"), Some("python"));
    }

    #[test]
    fn test_shell_signature() {
        assert_eq!(classify("if [ -z \"$1\" ]; then\n  exit 1\nfi"), Some("shell"));
    }

    #[test]
    fn test_json_signature() {
        assert_eq!(classify("{\n  \"key\": 1\n}"), Some("json"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify("nothing recognizable here"), None);
    }
}
