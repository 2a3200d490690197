//! Tool discovery: decide whether an external binary is usable before
//! spawning it.
//!
//! The renderer never consults `PATH` directly. It asks the
//! [`ToolProbe`] stored in [`crate::config::RenderConfig`], so tests and
//! embedders can simulate a missing compiler without touching the real
//! search path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Locates external tools by name.
///
/// Implementations must be `Send + Sync`; one probe is shared by every
/// render that uses the same config.
pub trait ToolProbe: Send + Sync {
    /// Return the executable path for `tool`, or `None` if it is unavailable.
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Convenience wrapper over [`ToolProbe::locate`].
    fn is_available(&self, tool: &str) -> bool {
        self.locate(tool).is_some()
    }
}

/// Resolves tools against the process `PATH`, the way a shell would.
///
/// A `tool` containing a path separator is never looked up on `PATH`. A
/// relative one is resolved against the current directory, so the returned
/// path stays valid when the tool runs inside the output directory.
#[derive(Debug, Clone, Default)]
pub struct SearchPathProbe {
    path_override: Option<OsString>,
}

impl SearchPathProbe {
    /// Probe the current process `PATH` (read at every lookup).
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe a fixed search path instead of the environment.
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            path_override: Some(path.into()),
        }
    }

    fn search_path(&self) -> Option<OsString> {
        self.path_override
            .clone()
            .or_else(|| std::env::var_os("PATH"))
    }
}

impl ToolProbe for SearchPathProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        if tool.is_empty() {
            return None;
        }

        let candidate = Path::new(tool);
        if candidate.is_absolute() {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }
        if candidate.components().count() > 1 {
            let resolved = std::env::current_dir().ok()?.join(candidate);
            return is_executable(&resolved).then_some(resolved);
        }

        let search_path = self.search_path()?;
        std::env::split_paths(&search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| executable_names(tool).into_iter().map(move |n| dir.join(n)))
            .find(|p| is_executable(p))
    }
}

/// A probe that answers from a fixed list. Useful for embedders that ship
/// their own toolchain and for simulating absent tools.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    tools: Vec<(String, PathBuf)>,
}

impl StaticProbe {
    /// A probe that reports every tool as missing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Register `tool` as available at `path`.
    pub fn with_tool(mut self, tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.tools.push((tool.into(), path.into()));
        self
    }
}

impl ToolProbe for StaticProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools
            .iter()
            .find(|(name, _)| name == tool)
            .map(|(_, path)| path.clone())
    }
}

/// The default probe used by [`crate::config::RenderConfig`].
pub fn default_probe() -> Arc<dyn ToolProbe> {
    Arc::new(SearchPathProbe::new())
}

#[cfg(windows)]
fn executable_names(tool: &str) -> Vec<String> {
    if Path::new(tool).extension().is_some() {
        return vec![tool.to_string()];
    }
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT;.COM".to_string());
    std::iter::once(tool.to_string())
        .chain(exts.split(';').filter(|e| !e.is_empty()).map(|e| format!("{tool}{e}")))
        .collect()
}

#[cfg(not(windows))]
fn executable_names(tool: &str) -> Vec<String> {
    vec![tool.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
