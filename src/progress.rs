//! Progress-callback trait for per-stage render events.
//!
//! Inject an [`Arc<dyn RenderProgressCallback>`] via
//! [`crate::config::RenderConfigBuilder::progress_callback`] to receive
//! events as the renderer moves through its stages.
//!
//! # Example
//!
//! ```rust
//! use paper_render::{RenderConfig, RenderProgressCallback, RenderStage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl RenderProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: RenderStage) {
//!         eprintln!("{stage} …");
//!     }
//! }
//!
//! let config = RenderConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn RenderProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::StageError;
use crate::output::{RenderOutcome, RenderStage};
use std::path::Path;
use std::sync::Arc;

/// Called by the renderer as it processes one document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events for one render arrive strictly in order on
/// the rendering task; separate renders may call the same callback from
/// different threads.
pub trait RenderProgressCallback: Send + Sync {
    /// Called before a stage begins.
    fn on_stage_start(&self, stage: RenderStage) {
        let _ = stage;
    }

    /// Called when a stage has written its artifact.
    ///
    /// # Arguments
    /// * `stage` — the finished stage
    /// * `path`  — the file the stage produced (`.tex` for
    ///   [`RenderStage::Sanitize`], a PDF for the others)
    fn on_stage_complete(&self, stage: RenderStage, path: &Path) {
        let _ = (stage, path);
    }

    /// Called when a stage fails.
    fn on_stage_error(&self, stage: RenderStage, error: &StageError) {
        let _ = (stage, error);
    }

    /// Called once with the final outcome.
    fn on_render_complete(&self, outcome: &RenderOutcome) {
        let _ = outcome;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenderProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenderConfig`].
pub type ProgressCallback = Arc<dyn RenderProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl RenderProgressCallback for Recorder {
        fn on_stage_start(&self, stage: RenderStage) {
            self.events.lock().unwrap().push(format!("start:{stage}"));
        }

        fn on_stage_error(&self, stage: RenderStage, error: &StageError) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error:{stage}:{}", error.tool()));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage_start(RenderStage::Primary);
        cb.on_stage_complete(RenderStage::Primary, Path::new("/tmp/x.pdf"));
        cb.on_stage_error(
            RenderStage::Fallback,
            &StageError::ToolMissing {
                tool: "pandoc".into(),
            },
        );
    }

    #[test]
    fn recorder_sees_events_in_order() {
        let rec = Recorder::default();
        rec.on_stage_start(RenderStage::Primary);
        rec.on_stage_error(
            RenderStage::Primary,
            &StageError::ToolMissing {
                tool: "tectonic".into(),
            },
        );
        rec.on_stage_start(RenderStage::Fallback);

        let events = rec.events.lock().unwrap();
        assert_eq!(
            *events,
            vec!["start:primary", "error:primary:tectonic", "start:fallback"]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn RenderProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_stage_start(RenderStage::Sanitize);
    }
}
