//! Primary compilation: run the native LaTeX compiler on the `.tex` source.
//!
//! Invoked as `<compiler> <file.tex> --outdir <output_dir>` with the output
//! directory as working directory, which is the calling convention of
//! `tectonic`. Any failure here is recoverable: the caller redirects it into
//! the fallback stage.

use crate::config::RenderConfig;
use crate::error::StageError;
use crate::pipeline::process::{run_tool, ToolInvocation};
use crate::pipeline::workspace::ArtifactPaths;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Compile `paths.tex` into `paths.pdf`.
pub async fn compile_primary(
    config: &RenderConfig,
    paths: &ArtifactPaths,
) -> Result<PathBuf, StageError> {
    info!("Compiling {} with {}", paths.tex.display(), config.compiler);
    run_tool(
        config.probe.as_ref(),
        ToolInvocation {
            tool: &config.compiler,
            args: primary_args(paths),
            cwd: &paths.dir,
            expected_output: &paths.pdf,
            timeout: Duration::from_secs(config.compile_timeout_secs),
        },
    )
    .await
}

fn primary_args(paths: &ArtifactPaths) -> Vec<OsString> {
    vec![
        paths.tex.clone().into_os_string(),
        OsString::from("--outdir"),
        paths.dir.clone().into_os_string(),
    ]
}
