//! Configuration types for LaTeX-to-PDF rendering.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. A config holds no per-render state, so one
//! instance can be shared by any number of independent renders.

use crate::error::RenderError;
use crate::probe::{default_probe, ToolProbe};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for a render.
///
/// Built via [`RenderConfig::builder()`] or using [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use paper_render::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .output_dir("build/papers")
///     .compile_timeout_secs(60)
///     .title("Notes on Attention")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RenderConfig {
    /// Directory that receives every artifact. Default: `output`.
    ///
    /// A relative path is resolved against the process working directory at
    /// render time, not when the config is built.
    pub output_dir: PathBuf,

    /// Primary compiler binary, invoked as
    /// `<compiler> <file.tex> --outdir <output_dir>`. Default: `tectonic`.
    pub compiler: String,

    /// Fallback converter binary (pandoc-compatible CLI). Default: `pandoc`.
    pub converter: String,

    /// PDF engine forwarded to the converter as `--pdf-engine`. Default: None
    /// (the converter's own default).
    pub pdf_engine: Option<String>,

    /// Hard limit for the primary compiler in seconds. Default: 120.
    ///
    /// The process is killed when the limit is hit and the render moves on
    /// to the fallback.
    pub compile_timeout_secs: u64,

    /// Hard limit for the fallback converter in seconds. Default: 120.
    pub fallback_timeout_secs: u64,

    /// Attempt the fallback conversion when the primary compiler fails. Default: true.
    pub fallback_enabled: bool,

    /// Filename prefix for every artifact. Default: `paper`.
    pub file_prefix: String,

    /// Title block written into the fixed preamble.
    pub meta: DocumentMeta,

    /// Tool discovery. Default: [`crate::probe::SearchPathProbe`].
    pub probe: Arc<dyn ToolProbe>,

    /// Optional progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            compiler: "tectonic".to_string(),
            converter: "pandoc".to_string(),
            pdf_engine: None,
            compile_timeout_secs: 120,
            fallback_timeout_secs: 120,
            fallback_enabled: true,
            file_prefix: "paper".to_string(),
            meta: DocumentMeta::default(),
            probe: default_probe(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("output_dir", &self.output_dir)
            .field("compiler", &self.compiler)
            .field("converter", &self.converter)
            .field("pdf_engine", &self.pdf_engine)
            .field("compile_timeout_secs", &self.compile_timeout_secs)
            .field("fallback_timeout_secs", &self.fallback_timeout_secs)
            .field("fallback_enabled", &self.fallback_enabled)
            .field("file_prefix", &self.file_prefix)
            .field("meta", &self.meta)
            .field("probe", &"<dyn ToolProbe>")
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RenderProgressCallback>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// The output directory as an absolute path, resolved against the
    /// current working directory.
    pub fn resolved_output_dir(&self) -> Result<PathBuf, RenderError> {
        if self.output_dir.is_absolute() {
            return Ok(self.output_dir.clone());
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&self.output_dir))
            .map_err(|e| RenderError::Workspace {
                path: self.output_dir.clone(),
                source: e,
            })
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn compiler(mut self, bin: impl Into<String>) -> Self {
        self.config.compiler = bin.into();
        self
    }

    pub fn converter(mut self, bin: impl Into<String>) -> Self {
        self.config.converter = bin.into();
        self
    }

    pub fn pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.config.pdf_engine = Some(engine.into());
        self
    }

    pub fn compile_timeout_secs(mut self, secs: u64) -> Self {
        self.config.compile_timeout_secs = secs;
        self
    }

    pub fn fallback_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fallback_timeout_secs = secs;
        self
    }

    pub fn fallback_enabled(mut self, v: bool) -> Self {
        self.config.fallback_enabled = v;
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.meta.title = title.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.config.meta.author = author.into();
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.config.meta.date = date.into();
        self
    }

    pub fn probe(mut self, probe: Arc<dyn ToolProbe>) -> Self {
        self.config.probe = probe;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        let c = &self.config;
        if c.compiler.trim().is_empty() {
            return Err(RenderError::InvalidConfig(
                "Compiler name must not be empty".into(),
            ));
        }
        if c.converter.trim().is_empty() {
            return Err(RenderError::InvalidConfig(
                "Converter name must not be empty".into(),
            ));
        }
        if c.file_prefix.is_empty() || c.file_prefix.contains(['/', '\\']) {
            return Err(RenderError::InvalidConfig(format!(
                "File prefix must be a plain name, got {:?}",
                c.file_prefix
            )));
        }
        if c.compile_timeout_secs == 0 || c.fallback_timeout_secs == 0 {
            return Err(RenderError::InvalidConfig(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(RenderError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Title block of the fixed preamble.
///
/// Values are inserted into the document verbatim, so LaTeX markup (e.g.
/// `\today`, `\and`) is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Default: `AI Research Paper`.
    pub title: String,
    /// Default: empty.
    pub author: String,
    /// Default: `\today`.
    pub date: String,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            title: "AI Research Paper".to_string(),
            author: String::new(),
            date: r"\today".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = RenderConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("output"));
        assert_eq!(c.compiler, "tectonic");
        assert_eq!(c.converter, "pandoc");
        assert!(c.fallback_enabled);
        assert_eq!(c.file_prefix, "paper");
        assert_eq!(c.meta.date, r"\today");
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let err = RenderConfig::builder()
            .compile_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_prefix_with_separator() {
        assert!(RenderConfig::builder().file_prefix("a/b").build().is_err());
        assert!(RenderConfig::builder().file_prefix("").build().is_err());
    }

    #[test]
    fn builder_rejects_blank_tool_names() {
        assert!(RenderConfig::builder().compiler("  ").build().is_err());
        assert!(RenderConfig::builder().converter("").build().is_err());
    }

    #[test]
    fn relative_output_dir_resolves_against_cwd() {
        let c = RenderConfig::default();
        let resolved = c.resolved_output_dir().unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("output"));
    }

    #[test]
    fn absolute_output_dir_is_kept() {
        let dir = std::env::temp_dir().join("paper-render-abs");
        let c = RenderConfig::builder().output_dir(&dir).build().unwrap();
        assert_eq!(c.resolved_output_dir().unwrap(), dir);
    }

    #[test]
    fn debug_hides_trait_objects() {
        let dbg = format!("{:?}", RenderConfig::default());
        assert!(dbg.contains("<dyn ToolProbe>"));
        assert!(dbg.contains("tectonic"));
    }
}
