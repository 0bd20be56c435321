//! Chroma Error Handling - Unified Diagnostic API
//!
//! All recoverable failures in the rendering pipeline are represented by
//! [`ChromaError`]. Parsing itself is total and never produces an error:
//! malformed markup degrades to plain text inside the parser. The variants
//! here cover the registry edges (format lookup, parser registration, theme
//! switching, hook points) and the final write boundary.

use miette::Diagnostic;
use thiserror::Error;

/// The single error type for the Chroma rendering pipeline.
///
/// Every variant carries enough context for the caller to retry with a
/// different name. Nothing in this enum is raised by `parse` itself.
#[derive(Debug, Error, Diagnostic)]
pub enum ChromaError {
    /// No registered parser matches the requested or detected format.
    #[error("unknown format '{name}'")]
    #[diagnostic(
        code(chroma::registry::unknown_format),
        help("registered formats: {available}")
    )]
    UnknownFormat { name: String, available: String },

    /// A parser or hook registration referenced something that does not exist.
    #[error("registration failed for '{name}': {reason}")]
    #[diagnostic(code(chroma::registry::registration))]
    Registration { name: String, reason: String },

    /// Theme switch target not found in built-ins or the external provider.
    #[error("unknown theme '{name}'")]
    #[diagnostic(
        code(chroma::theme::unknown_theme),
        help("available themes: {available}")
    )]
    UnknownTheme { name: String, available: String },

    /// Hook registration named a point outside the fixed enumeration.
    #[error("unknown hook point '{name}'")]
    #[diagnostic(
        code(chroma::hooks::unknown_point),
        help("valid points follow the render pipeline: pre_render, post_render, pre_line, post_line, transform_content, render_heading, render_code, render_quote, render_list, render_table, render_hr")
    )]
    UnknownHookPoint { name: String },

    /// Failure writing to the output stream.
    #[error("write failed: {0}")]
    #[diagnostic(code(chroma::io::write))]
    Io(#[from] std::io::Error),
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a ChromaError with full miette diagnostics.
///
/// This provides rich error formatting with codes and help text. Use this
/// for user-facing error display in CLI contexts.
pub fn print_error(error: ChromaError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
