//! Output-directory management and artifact naming.
//!
//! Every artifact of one render shares a stem derived from the local
//! wall-clock second: `paper_20261019_143000.tex`, `.pdf`, `.md` and
//! `_fallback.pdf`. The `.tex` file is created with `create_new`, which
//! reserves the stem atomically. When a second render lands in the same
//! second (or another process already owns the stem) a numeric suffix is
//! appended: `paper_20261019_143000_1`, `_2`, … A stem whose `.pdf`, `.md`
//! or `_fallback.pdf` is still on disk counts as taken too, so a stale PDF
//! can never pass for fresh compiler output. Nothing is ever overwritten
//! and nothing is ever deleted.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::output::RenderArtifacts;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Timestamp layout used in artifact stems.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Upper bound on collision suffixes tried for one timestamp.
const MAX_COLLISION_SUFFIX: u32 = 10_000;

/// The file set for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub stem: String,
    pub tex: PathBuf,
    pub pdf: PathBuf,
    pub markdown: PathBuf,
    pub fallback_pdf: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            tex: dir.join(format!("{stem}.tex")),
            pdf: dir.join(format!("{stem}.pdf")),
            markdown: dir.join(format!("{stem}.md")),
            fallback_pdf: dir.join(format!("{stem}_fallback.pdf")),
        }
    }

    /// Artifacts of a render that never reached the fallback.
    pub fn primary_artifacts(&self) -> RenderArtifacts {
        RenderArtifacts {
            tex: self.tex.clone(),
            pdf: self.pdf.clone(),
            markdown: None,
            fallback_pdf: None,
        }
    }

    /// Artifacts of a render that attempted the fallback.
    pub fn fallback_artifacts(&self) -> RenderArtifacts {
        RenderArtifacts {
            markdown: Some(self.markdown.clone()),
            fallback_pdf: Some(self.fallback_pdf.clone()),
            ..self.primary_artifacts()
        }
    }
}

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Create the output directory (idempotent), reserve a fresh stem and write
/// the assembled document to its `.tex` file.
pub async fn write_source(
    config: &RenderConfig,
    document: &str,
) -> Result<ArtifactPaths, RenderError> {
    let dir = config.resolved_output_dir()?;
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| RenderError::Workspace {
            path: dir.clone(),
            source: e,
        })?;

    let base = format!("{}_{}", config.file_prefix, timestamp_now());
    let (paths, mut file) = reserve(&dir, &base).await?;

    file.write_all(document.as_bytes())
        .await
        .map_err(|e| RenderError::Workspace {
            path: paths.tex.clone(),
            source: e,
        })?;
    file.flush().await.map_err(|e| RenderError::Workspace {
        path: paths.tex.clone(),
        source: e,
    })?;

    debug!("Wrote {} bytes to {}", document.len(), paths.tex.display());
    Ok(paths)
}

/// Claim the first free stem of `base`, `base_1`, `base_2`, …
async fn reserve(
    dir: &Path,
    base: &str,
) -> Result<(ArtifactPaths, tokio::fs::File), RenderError> {
    for n in 0..=MAX_COLLISION_SUFFIX {
        let stem = if n == 0 {
            base.to_string()
        } else {
            format!("{base}_{n}")
        };
        let paths = ArtifactPaths::new(dir, &stem);
        if has_leftover_outputs(&paths).await {
            debug!("Stem {} has leftover outputs, trying next suffix", stem);
            continue;
        }

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&paths.tex)
            .await
        {
            Ok(file) => return Ok((paths, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("Stem {} taken, trying next suffix", stem);
            }
            Err(e) => {
                return Err(RenderError::Workspace {
                    path: paths.tex,
                    source: e,
                })
            }
        }
    }

    Err(RenderError::Internal(format!(
        "No free artifact name for '{base}' after {MAX_COLLISION_SUFFIX} attempts"
    )))
}

async fn has_leftover_outputs(paths: &ArtifactPaths) -> bool {
    for output in [&paths.pdf, &paths.markdown, &paths.fallback_pdf] {
        if tokio::fs::symlink_metadata(output).await.is_ok() {
            return true;
        }
    }
    false
}
