//! Result types produced by a render.

use crate::error::{RenderError, StageError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// The stages of one render, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStage {
    /// Strip wrapper directives, assemble and write the `.tex` source.
    Sanitize,
    /// Native compiler run against the `.tex` source.
    Primary,
    /// Math rewrite, `.md` intermediate and converter run.
    Fallback,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderStage::Sanitize => "sanitize",
            RenderStage::Primary => "primary",
            RenderStage::Fallback => "fallback",
        })
    }
}

/// Every file one render may create, all inside the output directory.
///
/// `tex` and `pdf` share a stem; the fallback paths are only set once the
/// fallback has been attempted. Files are never removed by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderArtifacts {
    /// Assembled source, always written before any tool runs.
    pub tex: PathBuf,
    /// Where the primary compiler is expected to write its PDF.
    pub pdf: PathBuf,
    /// Markdown intermediate for the fallback converter.
    pub markdown: Option<PathBuf>,
    /// Where the fallback converter is expected to write its PDF.
    pub fallback_pdf: Option<PathBuf>,
}

/// Wall-clock timings for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub sanitize_ms: u64,
    pub primary_ms: u64,
    /// `None` when the fallback never ran.
    pub fallback_ms: Option<u64>,
    pub total_ms: u64,
}

/// What one render produced.
///
/// The two success variants only ever carry a path whose file existed when
/// the outcome was built.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RenderOutcome {
    /// The primary compiler produced the PDF.
    Primary {
        pdf: PathBuf,
        artifacts: RenderArtifacts,
        stats: RenderStats,
    },
    /// The primary compiler failed and the fallback converter produced the PDF.
    Fallback {
        pdf: PathBuf,
        artifacts: RenderArtifacts,
        stats: RenderStats,
        primary_error: StageError,
    },
    /// No PDF was produced.
    Failed(#[serde(serialize_with = "serialize_display")] RenderError),
}

impl RenderOutcome {
    /// Path of the produced PDF, if any.
    pub fn pdf_path(&self) -> Option<&Path> {
        match self {
            RenderOutcome::Primary { pdf, .. } | RenderOutcome::Fallback { pdf, .. } => Some(pdf),
            RenderOutcome::Failed(_) => None,
        }
    }

    /// The stage that produced the PDF, if any.
    pub fn stage(&self) -> Option<RenderStage> {
        match self {
            RenderOutcome::Primary { .. } => Some(RenderStage::Primary),
            RenderOutcome::Fallback { .. } => Some(RenderStage::Fallback),
            RenderOutcome::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, RenderOutcome::Failed(_))
    }

    /// Artifacts of a successful render.
    pub fn artifacts(&self) -> Option<&RenderArtifacts> {
        match self {
            RenderOutcome::Primary { artifacts, .. }
            | RenderOutcome::Fallback { artifacts, .. } => Some(artifacts),
            RenderOutcome::Failed(_) => None,
        }
    }

    /// Timings of a successful render.
    pub fn stats(&self) -> Option<&RenderStats> {
        match self {
            RenderOutcome::Primary { stats, .. } | RenderOutcome::Fallback { stats, .. } => {
                Some(stats)
            }
            RenderOutcome::Failed(_) => None,
        }
    }

    /// Collapse into the tool-shaped `Result<PathBuf, RenderError>`.
    pub fn into_result(self) -> Result<PathBuf, RenderError> {
        match self {
            RenderOutcome::Primary { pdf, .. } | RenderOutcome::Fallback { pdf, .. } => Ok(pdf),
            RenderOutcome::Failed(e) => Err(e),
        }
    }
}

fn serialize_display<S: Serializer>(err: &RenderError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts() -> RenderArtifacts {
        RenderArtifacts {
            tex: PathBuf::from("/out/paper_20260101_120000.tex"),
            pdf: PathBuf::from("/out/paper_20260101_120000.pdf"),
            markdown: None,
            fallback_pdf: None,
        }
    }

    #[test]
    fn primary_outcome_yields_path() {
        let outcome = RenderOutcome::Primary {
            pdf: PathBuf::from("/out/paper_20260101_120000.pdf"),
            artifacts: artifacts(),
            stats: RenderStats::default(),
        };
        assert_eq!(outcome.stage(), Some(RenderStage::Primary));
        assert!(outcome.is_success());
        assert_eq!(
            outcome.into_result().unwrap(),
            PathBuf::from("/out/paper_20260101_120000.pdf")
        );
    }

    #[test]
    fn failed_outcome_yields_error() {
        let outcome = RenderOutcome::Failed(RenderError::Internal("boom".into()));
        assert!(outcome.pdf_path().is_none());
        assert!(outcome.artifacts().is_none());
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn outcome_serialises_with_tag() {
        let outcome = RenderOutcome::Fallback {
            pdf: PathBuf::from("/out/paper_fallback.pdf"),
            artifacts: artifacts(),
            stats: RenderStats {
                fallback_ms: Some(12),
                ..RenderStats::default()
            },
            primary_error: StageError::ToolMissing {
                tool: "tectonic".into(),
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "fallback");
        assert_eq!(json["detail"]["stats"]["fallback_ms"], 12);
        assert!(json["detail"]["primary_error"]["ToolMissing"].is_object());

        let failed = RenderOutcome::Failed(RenderError::InvalidConfig("x".into()));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["detail"], "Invalid configuration: x");
    }

    #[test]
    fn stage_display_is_lowercase() {
        assert_eq!(RenderStage::Sanitize.to_string(), "sanitize");
        assert_eq!(RenderStage::Fallback.to_string(), "fallback");
    }
}
