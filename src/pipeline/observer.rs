use std::time::Duration;

use crate::error::AnalysisError;

use super::state::PipelineState;

/// Observer hook for pipeline progress.
///
/// Every method has a no-op default, so implementors only override what they need.
pub trait PipelineObserver: Send + Sync {
    fn on_transition(&self, _from: PipelineState, _to: PipelineState) {}

    /// A stage finished successfully after `elapsed`.
    fn on_stage_finished(&self, _stage: PipelineState, _elapsed: Duration) {}

    /// An input was missing and generated example data is used instead.
    fn on_fallback(&self, _cause: &AnalysisError) {}

    fn on_failure(&self, _stage: PipelineState, _error: &AnalysisError) {}

    fn on_completed(&self, _elapsed: Duration) {}
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrPipelineObserver;

impl PipelineObserver for StdErrPipelineObserver {
    fn on_transition(&self, from: PipelineState, to: PipelineState) {
        eprintln!("[pipeline] {from} -> {to}");
    }

    fn on_stage_finished(&self, stage: PipelineState, elapsed: Duration) {
        eprintln!("[pipeline][ok] stage={stage} elapsed={elapsed:?}");
    }

    fn on_fallback(&self, cause: &AnalysisError) {
        eprintln!("[pipeline][fallback] using example data: {cause}");
    }

    fn on_failure(&self, stage: PipelineState, error: &AnalysisError) {
        eprintln!("[pipeline][failed] stage={stage} err={error}");
    }

    fn on_completed(&self, elapsed: Duration) {
        eprintln!("[pipeline][done] elapsed={elapsed:?}");
    }
}
