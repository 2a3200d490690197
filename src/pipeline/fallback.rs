//! Fallback conversion: a lossy Markdown rendering compiled by pandoc.
//!
//! Runs only after the primary compiler failed. The sanitised body is
//! treated as Markdown with embedded raw LaTeX; its `$…$` spans are
//! rewritten to `\(…\)` so the converter's
//! `tex_math_single_backslash` reader picks them up as inline math.
//!
//! ## Known limitation
//!
//! The math rewrite is a regex pass. `$$…$$` display blocks and escaped
//! `\$` are left alone, spans never cross a line break, and nested or
//! unbalanced dollars may convert incorrectly.

use crate::config::RenderConfig;
use crate::error::StageError;
use crate::pipeline::process::{run_tool, ToolInvocation};
use crate::pipeline::workspace::ArtifactPaths;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Reader spec passed to the converter via `--from`.
pub const MARKDOWN_READER: &str = "markdown+tex_math_single_backslash";

// Alternation order matters: backslash pairs (`\\` line breaks), escaped
// dollars and display blocks are consumed first so only an unescaped
// dollar can open an inline span.
static RE_MATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\\\|\\\$|\$\$.*?\$\$|\$([^$\n]+?)\$").unwrap()
});

/// Rewrite single-dollar inline math into `\(…\)` form.
pub fn inline_math_to_markdown(input: &str) -> String {
    RE_MATH
        .replace_all(input, |caps: &Captures<'_>| match caps.get(1) {
            Some(inner) => format!(r"\({}\)", inner.as_str()),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Write the Markdown intermediate and convert it to `paths.fallback_pdf`.
pub async fn convert_fallback(
    config: &RenderConfig,
    paths: &ArtifactPaths,
    sanitized_body: &str,
) -> Result<PathBuf, StageError> {
    let markdown = inline_math_to_markdown(sanitized_body);
    tokio::fs::write(&paths.markdown, &markdown)
        .await
        .map_err(|e| StageError::Io {
            tool: config.converter.clone(),
            detail: format!("writing {}: {e}", paths.markdown.display()),
        })?;
    debug!("Wrote fallback markdown to {}", paths.markdown.display());

    info!(
        "Converting {} with {}",
        paths.markdown.display(),
        config.converter
    );
    run_tool(
        config.probe.as_ref(),
        ToolInvocation {
            tool: &config.converter,
            args: fallback_args(config, paths),
            cwd: &paths.dir,
            expected_output: &paths.fallback_pdf,
            timeout: Duration::from_secs(config.fallback_timeout_secs),
        },
    )
    .await
}

fn fallback_args(config: &RenderConfig, paths: &ArtifactPaths) -> Vec<OsString> {
    let mut args = vec![
        paths.markdown.clone().into_os_string(),
        OsString::from("--from"),
        OsString::from(MARKDOWN_READER),
        OsString::from("--standalone"),
        OsString::from("--output"),
        paths.fallback_pdf.clone().into_os_string(),
    ];
    if !config.meta.title.is_empty() {
        args.push(OsString::from("--metadata"));
        args.push(OsString::from(format!("title={}", config.meta.title)));
    }
    if !config.meta.author.is_empty() {
        args.push(OsString::from("--metadata"));
        args.push(OsString::from(format!("author={}", config.meta.author)));
    }
    if let Some(ref engine) = config.pdf_engine {
        args.push(OsString::from(format!("--pdf-engine={engine}")));
    }
    args
}
