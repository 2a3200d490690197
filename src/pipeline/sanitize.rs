//! Sanitisation: strip document-wrapper directives from a caller's body.
//!
//! Callers (usually a language model) often send a complete document even
//! when asked for the body only. The renderer wraps every body in its own
//! fixed preamble, so a second `\documentclass` or `\begin{document}` would
//! break the compile. This pass removes exactly those directives and leaves
//! every other byte untouched.
//!
//! ## Known limitation
//!
//! This is a line-oriented regex pass, not a LaTeX parser. A directive that
//! sits on its own line inside `verbatim` or `lstlisting` is stripped like
//! any other. Directives spread across several lines (e.g. a `\usepackage`
//! whose option list wraps) are left alone and will surface as a compile
//! error.
//!
//! ## Rule Order
//!
//! Whole-line rules run first so a directive's line break goes with it.
//! Only then are stray `\begin{document}` / `\end{document}` markers that
//! share a line with real content cut out of that line.

use once_cell::sync::Lazy;
use regex::Regex;

/// Remove redundant wrapper directives from a document body.
///
/// Rules (applied in order):
/// 1. Drop lines holding only `\documentclass` / `\usepackage` directives
///    (with optional `[options]` and a trailing `%` comment)
/// 2. Drop lines holding only `\begin{document}` or `\end{document}`
/// 3. Cut any remaining `\begin{document}` / `\end{document}` markers out
///    of the line they share with other content
pub fn sanitize_body(input: &str) -> String {
    let s = strip_preamble_lines(input);
    let s = strip_document_marker_lines(&s);
    strip_inline_document_markers(&s)
}

// ── Rule 1: Preamble directive lines ─────────────────────────────────────────

static RE_PREAMBLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:\\(?:documentclass|usepackage)(?:\[[^\]\n]*\])?\{[^}\n]*\}[ \t]*)+(?:%[^\n]*)?(?:\r?\n|$)",
    )
    .unwrap()
});

fn strip_preamble_lines(input: &str) -> String {
    RE_PREAMBLE_LINE.replace_all(input, "").into_owned()
}

// ── Rule 2: Document marker lines ────────────────────────────────────────────

static RE_MARKER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\\(?:begin|end)\{document\}[ \t]*(?:%[^\n]*)?(?:\r?\n|$)").unwrap()
});

fn strip_document_marker_lines(input: &str) -> String {
    RE_MARKER_LINE.replace_all(input, "").into_owned()
}

// ── Rule 3: Inline document markers ──────────────────────────────────────────

static RE_INLINE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:begin|end)\{document\}").unwrap());

fn strip_inline_document_markers(input: &str) -> String {
    RE_INLINE_MARKER.replace_all(input, "").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
