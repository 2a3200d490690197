//! Error types for the paper-render library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`StageError`] — **Non-fatal**: one stage (primary compile or fallback
//!   conversion) did not produce a PDF. A primary `StageError` is caught and
//!   redirected into the fallback stage; it is also kept inside
//!   [`crate::output::RenderOutcome::Fallback`] for diagnostics.
//!
//! * [`RenderError`] — **Fatal**: the render as a whole produced no PDF.
//!   Returned as `Err(RenderError)` from [`crate::render_latex_pdf`] and
//!   carried by [`crate::output::RenderOutcome::Failed`].
//!
//! Compiler diagnostics are never parsed. Whatever the tool wrote to stderr
//! is stored verbatim and reproduced in the `Display` output.

use std::path::PathBuf;
use thiserror::Error;

/// A failure of a single external-tool stage.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum StageError {
    /// The tool could not be found on the search path.
    #[error("'{tool}' is not installed or not on PATH")]
    ToolMissing { tool: String },

    /// The tool ran but exited non-zero.
    #[error("'{tool}' failed (exit {}):\n{stderr}", exit_label(.exit_code))]
    CompileFailed {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The tool exited cleanly but the expected file is absent.
    #[error("'{tool}' exited successfully but did not produce '{}'", .path.display())]
    OutputNotProduced { tool: String, path: PathBuf },

    /// The tool did not finish within the configured limit and was killed.
    #[error("'{tool}' timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },

    /// Spawning the tool or writing its input failed.
    #[error("'{tool}' could not be run: {detail}")]
    Io { tool: String, detail: String },
}

impl StageError {
    /// True when the tool was absent rather than broken.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, StageError::ToolMissing { .. })
    }

    /// Name of the tool this failure belongs to.
    pub fn tool(&self) -> &str {
        match self {
            StageError::ToolMissing { tool }
            | StageError::CompileFailed { tool, .. }
            | StageError::OutputNotProduced { tool, .. }
            | StageError::TimedOut { tool, .. }
            | StageError::Io { tool, .. } => tool,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// All fatal errors returned by the paper-render library.
#[derive(Debug, Error)]
pub enum RenderError {
    // ── Filesystem errors ─────────────────────────────────────────────────
    /// The output directory or one of the source files could not be written.
    #[error("Failed to prepare '{}': {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Stage errors ──────────────────────────────────────────────────────
    /// The primary compiler failed and the fallback is disabled.
    #[error("Primary compiler failed: {0}")]
    PrimaryFailed(StageError),

    /// Both the primary compiler and the fallback conversion failed.
    #[error("Primary compiler failed: {primary}\nFallback conversion failed: {fallback}")]
    Composite {
        primary: StageError,
        fallback: StageError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RenderError {
    /// The fallback-stage cause, when the fallback was attempted.
    pub fn fallback_cause(&self) -> Option<&StageError> {
        match self {
            RenderError::Composite { fallback, .. } => Some(fallback),
            _ => None,
        }
    }

    /// The primary-stage cause, when the primary compiler was attempted.
    pub fn primary_cause(&self) -> Option<&StageError> {
        match self {
            RenderError::PrimaryFailed(primary) | RenderError::Composite { primary, .. } => {
                Some(primary)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_failed_display_keeps_stderr_verbatim() {
        let e = StageError::CompileFailed {
            tool: "tectonic".into(),
            exit_code: Some(1),
            stderr: "! Undefined control sequence.\nl.12 \\foo".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("exit 1"), "got: {msg}");
        assert!(msg.contains("! Undefined control sequence.\nl.12 \\foo"));
    }

    #[test]
    fn compile_failed_without_exit_code() {
        let e = StageError::CompileFailed {
            tool: "tectonic".into(),
            exit_code: None,
            stderr: String::new(),
        };
        assert!(e.to_string().contains("exit signal"));
    }

    #[test]
    fn composite_display_mentions_both_causes() {
        let e = RenderError::Composite {
            primary: StageError::CompileFailed {
                tool: "tectonic".into(),
                exit_code: Some(1),
                stderr: "Undefined control sequence".into(),
            },
            fallback: StageError::ToolMissing {
                tool: "pandoc".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("Undefined control sequence"));
        assert!(msg.contains("pandoc"));
        assert!(msg.contains("tectonic"));
    }

    #[test]
    fn tool_missing_is_distinct_from_tool_failed() {
        let missing = StageError::ToolMissing {
            tool: "tectonic".into(),
        };
        let failed = StageError::OutputNotProduced {
            tool: "tectonic".into(),
            path: PathBuf::from("/tmp/out/paper.pdf"),
        };
        assert!(missing.is_tool_missing());
        assert!(!failed.is_tool_missing());
        assert_eq!(failed.tool(), "tectonic");
    }

    #[test]
    fn causes_are_exposed() {
        let primary = StageError::TimedOut {
            tool: "tectonic".into(),
            secs: 5,
        };
        let e = RenderError::PrimaryFailed(primary.clone());
        assert_eq!(e.primary_cause(), Some(&primary));
        assert!(e.fallback_cause().is_none());
    }
}
