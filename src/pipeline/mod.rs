//! Pipeline stages for LaTeX-to-PDF rendering.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable; only [`compile`] and [`fallback`] spawn
//! processes, and both go through [`process`].
//!
//! ## Data Flow
//!
//! ```text
//! sanitize ──▶ assemble ──▶ workspace ──▶ compile ──(failed)──▶ fallback
//! (strip)      (preamble)   (.tex)        (tectonic)            (.md → pandoc)
//! ```
//!
//! 1. [`sanitize`]  — remove redundant `\documentclass`, `\usepackage` and
//!    document markers from the caller's body
//! 2. [`assemble`]  — wrap the body in the fixed preamble and closing marker
//! 3. [`workspace`] — create the output directory, reserve a unique stem and
//!    write the `.tex` source
//! 4. [`compile`]   — run the primary compiler; its failure is recoverable
//! 5. [`fallback`]  — rewrite inline math, write the `.md` intermediate and
//!    run the converter
//!
//! [`process`] holds the shared spawn/timeout/verify logic.

pub mod assemble;
pub mod compile;
pub mod fallback;
pub mod process;
pub mod sanitize;
pub mod workspace;
