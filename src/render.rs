//! Render entry points.
//!
//! One call renders one document. The stages run strictly in sequence and
//! share nothing with other calls except the output directory, which is
//! only ever appended to.
//!
//! ```text
//! body ─▶ sanitize ─▶ assemble ─▶ .tex ─▶ primary ──ok──▶ Primary(pdf)
//!                                            │
//!                                          failed
//!                                            ▼
//!                                  .md ─▶ fallback ──ok──▶ Fallback(pdf)
//!                                            │
//!                                          failed ──▶ Failed(Composite)
//! ```

use crate::config::RenderConfig;
use crate::error::{RenderError, StageError};
use crate::output::{RenderOutcome, RenderStage, RenderStats};
use crate::pipeline::{assemble, compile, fallback, sanitize, workspace};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Render a document body to PDF.
///
/// Never returns early with a bare error: every failure is reported as
/// [`RenderOutcome::Failed`]. The `.tex` source is always written before
/// any compiler runs.
pub async fn render(body: impl AsRef<str>, config: &RenderConfig) -> RenderOutcome {
    let outcome = render_inner(body.as_ref(), config).await;
    match &outcome {
        RenderOutcome::Primary { pdf, .. } => info!("Rendered PDF at {}", pdf.display()),
        RenderOutcome::Fallback { pdf, .. } => {
            info!("Rendered fallback PDF at {}", pdf.display())
        }
        RenderOutcome::Failed(e) => warn!("Render failed: {}", e),
    }
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(&outcome);
    }
    outcome
}

/// Render a document body and return the path of the produced PDF.
///
/// This is the tool-shaped entry point for agent frameworks: the returned
/// path always refers to a file that existed when the call returned.
///
/// # Errors
/// - [`RenderError::Workspace`] when the output directory or `.tex` source
///   cannot be written
/// - [`RenderError::Composite`] when the primary compiler and the fallback
///   both failed; its message contains both diagnostics
/// - [`RenderError::PrimaryFailed`] when the primary failed and the
///   fallback is disabled
pub async fn render_latex_pdf(
    body: impl AsRef<str>,
    config: &RenderConfig,
) -> Result<PathBuf, RenderError> {
    render(body, config).await.into_result()
}

/// Synchronous wrapper around [`render`].
///
/// Creates a temporary tokio runtime internally, so it must not be called
/// from inside an async context.
pub fn render_sync(
    body: impl AsRef<str>,
    config: &RenderConfig,
) -> Result<RenderOutcome, RenderError> {
    Ok(tokio::runtime::Runtime::new()
        .map_err(|e| RenderError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(render(body, config)))
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn render_inner(body: &str, config: &RenderConfig) -> RenderOutcome {
    let total_start = Instant::now();
    let mut stats = RenderStats::default();

    // ── Step 1: Sanitize, assemble, write .tex ───────────────────────────
    stage_start(config, RenderStage::Sanitize);
    let sanitized = sanitize::sanitize_body(body);
    let document = assemble::assemble_document(&sanitized, &config.meta);
    let paths = match workspace::write_source(config, &document).await {
        Ok(p) => p,
        Err(e) => return RenderOutcome::Failed(e),
    };
    stats.sanitize_ms = total_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(RenderStage::Sanitize, &paths.tex);
    }

    // ── Step 2: Primary compiler ─────────────────────────────────────────
    stage_start(config, RenderStage::Primary);
    let primary_start = Instant::now();
    let primary_result = compile::compile_primary(config, &paths).await;
    stats.primary_ms = primary_start.elapsed().as_millis() as u64;

    let primary_error = match primary_result {
        Ok(pdf) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_stage_complete(RenderStage::Primary, &pdf);
            }
            stats.total_ms = total_start.elapsed().as_millis() as u64;
            return RenderOutcome::Primary {
                pdf,
                artifacts: paths.primary_artifacts(),
                stats,
            };
        }
        Err(e) => {
            stage_error(config, RenderStage::Primary, &e);
            e
        }
    };

    if !config.fallback_enabled {
        return RenderOutcome::Failed(RenderError::PrimaryFailed(primary_error));
    }

    // ── Step 3: Fallback conversion ──────────────────────────────────────
    if primary_error.is_tool_missing() {
        warn!("{}; trying fallback conversion", primary_error);
    } else {
        warn!("Primary compile failed; trying fallback conversion");
    }
    stage_start(config, RenderStage::Fallback);
    let fallback_start = Instant::now();
    let fallback_result = fallback::convert_fallback(config, &paths, &sanitized).await;
    stats.fallback_ms = Some(fallback_start.elapsed().as_millis() as u64);
    stats.total_ms = total_start.elapsed().as_millis() as u64;

    match fallback_result {
        Ok(pdf) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_stage_complete(RenderStage::Fallback, &pdf);
            }
            RenderOutcome::Fallback {
                pdf,
                artifacts: paths.fallback_artifacts(),
                stats,
                primary_error,
            }
        }
        Err(fallback_error) => {
            stage_error(config, RenderStage::Fallback, &fallback_error);
            RenderOutcome::Failed(RenderError::Composite {
                primary: primary_error,
                fallback: fallback_error,
            })
        }
    }
}

fn stage_start(config: &RenderConfig, stage: RenderStage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

fn stage_error(config: &RenderConfig, stage: RenderStage, error: &StageError) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_error(stage, error);
    }
}
