//! External-tool invocation shared by the primary and fallback stages.
//!
//! A run only counts as successful when the process exits with status zero
//! **and** the expected output file exists with non-zero size afterwards.
//! stderr is captured and passed through untouched.

use crate::error::StageError;
use crate::probe::ToolProbe;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// One external-tool call.
#[derive(Debug, Clone)]
pub struct ToolInvocation<'a> {
    /// Name (or path) handed to the probe.
    pub tool: &'a str,
    pub args: Vec<OsString>,
    /// Working directory of the child.
    pub cwd: &'a Path,
    /// File the tool must produce.
    pub expected_output: &'a Path,
    /// The child is killed when this elapses.
    pub timeout: Duration,
}

/// Run `inv` to completion and verify its output file.
///
/// Returns the path of the produced file.
pub async fn run_tool(
    probe: &dyn ToolProbe,
    inv: ToolInvocation<'_>,
) -> Result<PathBuf, StageError> {
    let tool = inv.tool.to_string();
    let program = probe
        .locate(inv.tool)
        .ok_or_else(|| StageError::ToolMissing { tool: tool.clone() })?;

    debug!(
        "Running {} {:?} (cwd {})",
        program.display(),
        inv.args,
        inv.cwd.display()
    );

    let started = Instant::now();
    let child = Command::new(&program)
        .args(&inv.args)
        .current_dir(inv.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(inv.timeout, child).await {
        Err(_) => {
            warn!(
                tool = %tool,
                timeout_secs = inv.timeout.as_secs(),
                "Tool timed out and was killed"
            );
            return Err(StageError::TimedOut {
                tool,
                secs: inv.timeout.as_secs(),
            });
        }
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
            warn!(tool = %tool, error = %e, "Tool vanished between probe and spawn");
            return Err(StageError::ToolMissing { tool });
        }
        Ok(Err(e)) => {
            warn!(tool = %tool, error = %e, "Failed to spawn tool");
            return Err(StageError::Io {
                tool,
                detail: e.to_string(),
            });
        }
        Ok(Ok(output)) => output,
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!(
            tool = %tool,
            exit_code = output.status.code().unwrap_or(-1),
            elapsed_ms,
            stderr = %stderr,
            "Tool exited with failure"
        );
        return Err(StageError::CompileFailed {
            tool,
            exit_code: output.status.code(),
            stderr,
        });
    }

    match tokio::fs::metadata(inv.expected_output).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {
            info!(
                "{} produced {} ({} bytes) in {}ms",
                tool,
                inv.expected_output.display(),
                meta.len(),
                elapsed_ms
            );
            Ok(inv.expected_output.to_path_buf())
        }
        _ => {
            warn!(
                tool = %tool,
                expected = %inv.expected_output.display(),
                "Tool exited cleanly without producing output"
            );
            Err(StageError::OutputNotProduced {
                tool,
                path: inv.expected_output.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;

    #[tokio::test]
    async fn missing_tool_is_reported_before_spawn() {
        let tmp = tempfile::TempDir::new().unwrap();
        let expected = tmp.path().join("out.pdf");
        let err = run_tool(
            &StaticProbe::none(),
            ToolInvocation {
                tool: "tectonic",
                args: vec![],
                cwd: tmp.path(),
                expected_output: &expected,
                timeout: Duration::from_secs(5),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            StageError::ToolMissing {
                tool: "tectonic".into()
            }
        );
    }

    #[tokio::test]
    async fn probe_pointing_at_nothing_is_tool_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let expected = tmp.path().join("out.pdf");
        let probe = StaticProbe::none().with_tool("ghost", tmp.path().join("no-such-binary"));
        let err = run_tool(
            &probe,
            ToolInvocation {
                tool: "ghost",
                args: vec![],
                cwd: tmp.path(),
                expected_output: &expected,
                timeout: Duration::from_secs(5),
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_tool_missing(), "got {err:?}");
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        async fn run(
            body: &str,
            timeout: Duration,
        ) -> (tempfile::TempDir, Result<PathBuf, StageError>) {
            let tmp = tempfile::TempDir::new().unwrap();
            let bin = script(tmp.path(), "fake-tool", body);
            let probe = StaticProbe::none().with_tool("fake-tool", bin);
            let expected = tmp.path().join("out.pdf");
            let result = run_tool(
                &probe,
                ToolInvocation {
                    tool: "fake-tool",
                    args: vec![OsString::from("out.pdf")],
                    cwd: tmp.path(),
                    expected_output: &expected,
                    timeout,
                },
            )
            .await;
            (tmp, result)
        }

        #[tokio::test]
        async fn success_requires_output_file() {
            let (_tmp, result) = run("printf '%%PDF-1.5' > \"$1\"", Duration::from_secs(10)).await;
            let path = result.unwrap();
            assert!(path.ends_with("out.pdf"));
        }

        #[tokio::test]
        async fn zero_exit_without_file_is_output_not_produced() {
            let (_tmp, result) = run("exit 0", Duration::from_secs(10)).await;
            assert!(matches!(
                result.unwrap_err(),
                StageError::OutputNotProduced { .. }
            ));
        }

        #[tokio::test]
        async fn empty_output_file_is_output_not_produced() {
            let (_tmp, result) = run(": > \"$1\"", Duration::from_secs(10)).await;
            assert!(matches!(
                result.unwrap_err(),
                StageError::OutputNotProduced { .. }
            ));
        }

        #[tokio::test]
        async fn non_zero_exit_keeps_stderr() {
            let (_tmp, result) = run(
                "echo '! Undefined control sequence.' >&2\nexit 1",
                Duration::from_secs(10),
            )
            .await;
            match result.unwrap_err() {
                StageError::CompileFailed {
                    exit_code, stderr, ..
                } => {
                    assert_eq!(exit_code, Some(1));
                    assert!(stderr.contains("! Undefined control sequence."));
                }
                other => panic!("unexpected error variant: {other:?}"),
            }
        }

        #[tokio::test]
        async fn hung_tool_is_killed() {
            let (_tmp, result) = run("sleep 30", Duration::from_millis(300)).await;
            assert!(matches!(result.unwrap_err(), StageError::TimedOut { .. }));
        }
    }
}
