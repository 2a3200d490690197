//! # paper-render
//!
//! Render the LaTeX body of a research write-up into a PDF.
//!
//! ## Why this crate?
//!
//! Language models asked for "the body of a LaTeX paper" return anything
//! from a clean list of `\section`s to a full document with its own
//! `\documentclass`. Feeding that straight to a compiler fails often enough
//! to matter. This crate normalises the body, wraps it in a fixed preamble,
//! compiles it with a native LaTeX compiler, and when that fails converts a
//! math-adjusted Markdown rendering with pandoc instead. The caller gets a
//! path to a PDF that exists, or an error that carries every diagnostic.
//!
//! ## Pipeline Overview
//!
//! ```text
//! body
//!  │
//!  ├─ 1. Sanitize  strip \documentclass, \usepackage, document markers
//!  ├─ 2. Assemble  fixed preamble + body + \end{document} → paper_<ts>.tex
//!  ├─ 3. Primary   tectonic paper_<ts>.tex --outdir <dir>   → paper_<ts>.pdf
//!  └─ 4. Fallback  $…$ → \(…\), pandoc paper_<ts>.md         → paper_<ts>_fallback.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paper_render::{render_latex_pdf, RenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::default();
//!     let pdf = render_latex_pdf(r"\section{Intro} Hello world. $E=mc^2$", &config).await?;
//!     println!("{}", pdf.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `paper-render` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## External tools
//!
//! | Stage    | Default    | Override |
//! |----------|------------|----------|
//! | Primary  | `tectonic` | [`RenderConfigBuilder::compiler`] |
//! | Fallback | `pandoc`   | [`RenderConfigBuilder::converter`], [`RenderConfigBuilder::pdf_engine`] |
//!
//! Tool lookup goes through a [`ToolProbe`]; swap it to pin tool locations
//! or to simulate a missing compiler.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DocumentMeta, RenderConfig, RenderConfigBuilder};
pub use error::{RenderError, StageError};
pub use output::{RenderArtifacts, RenderOutcome, RenderStage, RenderStats};
pub use pipeline::assemble::assemble_document;
pub use pipeline::fallback::inline_math_to_markdown;
pub use pipeline::sanitize::sanitize_body;
pub use probe::{SearchPathProbe, StaticProbe, ToolProbe};
pub use progress::{NoopProgressCallback, ProgressCallback, RenderProgressCallback};
pub use render::{render, render_latex_pdf, render_sync};
