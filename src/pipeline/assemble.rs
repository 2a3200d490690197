//! Document assembly: wrap a sanitised body in the fixed preamble.
//!
//! The preamble is deliberately small and fixed (article class, UTF-8 input,
//! AMS math, hyperref, graphicx, 1-inch margins) so every body the renderer
//! receives compiles against the same, predictable set of packages.

use crate::config::DocumentMeta;

/// Packages loaded by every assembled document, in load order.
pub const PREAMBLE_PACKAGES: &[&str] = &[
    r"\usepackage[utf8]{inputenc}",
    r"\usepackage{amsmath, amssymb}",
    r"\usepackage{hyperref}",
    r"\usepackage{graphicx}",
    r"\usepackage[margin=1in]{geometry}",
];

/// Closing marker appended after the body.
pub const DOCUMENT_END: &str = "\n\\end{document}\n";

/// Build the fixed preamble up to and including `\maketitle`.
pub fn preamble(meta: &DocumentMeta) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("\\documentclass{article}\n");
    for pkg in PREAMBLE_PACKAGES {
        out.push_str(pkg);
        out.push('\n');
    }
    out.push_str(&format!("\\title{{{}}}\n", meta.title));
    out.push_str(&format!("\\author{{{}}}\n", meta.author));
    out.push_str(&format!("\\date{{{}}}\n", meta.date));
    out.push_str("\n\\begin{document}\n\\maketitle\n");
    out
}

/// Concatenate preamble, body and closing marker.
///
/// `body` is expected to be sanitised already (see
/// [`crate::pipeline::sanitize::sanitize_body`]); it is inserted verbatim.
pub fn assemble_document(body: &str, meta: &DocumentMeta) -> String {
    let head = preamble(meta);
    let mut doc = String::with_capacity(head.len() + body.len() + DOCUMENT_END.len());
    doc.push_str(&head);
    doc.push_str(body);
    doc.push_str(DOCUMENT_END);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sanitize::sanitize_body;

    #[test]
    fn document_contains_body_between_markers() {
        let doc = assemble_document("Hello world. $E=mc^2$", &DocumentMeta::default());
        let begin = doc.find("\\begin{document}").unwrap();
        let body = doc.find("Hello world.").unwrap();
        let end = doc.find("\\end{document}").unwrap();
        assert!(begin < body && body < end);
        assert!(doc.ends_with("\\end{document}\n"));
    }

    #[test]
    fn preamble_declares_required_packages() {
        let head = preamble(&DocumentMeta::default());
        for needle in [
            "{article}",
            "inputenc",
            "amsmath",
            "amssymb",
            "hyperref",
            "graphicx",
            "margin=1in",
        ] {
            assert!(head.contains(needle), "missing {needle}");
        }
        assert!(head.contains("\\title{AI Research Paper}"));
        assert!(head.contains("\\date{\\today}"));
        assert!(head.contains("\\maketitle"));
    }

    #[test]
    fn sanitised_wrapper_yields_single_documentclass() {
        let body = "\\documentclass{report}\n\\usepackage{foo}\n\\begin{document}...\\end{document}";
        let doc = assemble_document(&sanitize_body(body), &DocumentMeta::default());
        assert_eq!(doc.matches("\\documentclass").count(), 1);
        assert_eq!(doc.matches("\\begin{document}").count(), 1);
        assert_eq!(doc.matches("\\end{document}").count(), 1);
        assert!(!doc.contains("{report}"));
        assert!(!doc.contains("{foo}"));
    }

    #[test]
    fn meta_is_inserted_verbatim() {
        let meta = DocumentMeta {
            title: "On $\\alpha$".into(),
            author: "A. Author \\and B. Author".into(),
            date: "2026".into(),
        };
        let head = preamble(&meta);
        assert!(head.contains("\\title{On $\\alpha$}"));
        assert!(head.contains("\\author{A. Author \\and B. Author}"));
        assert!(head.contains("\\date{2026}"));
    }
}
