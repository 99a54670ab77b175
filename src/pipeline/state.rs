use std::fmt;

/// Stages of one analysis run.
///
/// ```text
/// Idle -> Loading -> Validating -> Transforming -> Aggregating -> Filtering -> Exporting -> Done
///           ^  |
///           +--+  (example-data fallback)
/// ```
///
/// `Failed` is reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Loading,
    Validating,
    Transforming,
    Aggregating,
    Filtering,
    Exporting,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Whether the run may move from `self` to `next`.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;

        if self.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }
        matches!(
            (self, next),
            (Idle, Loading)
                | (Loading, Loading)
                | (Loading, Validating)
                | (Validating, Transforming)
                | (Transforming, Aggregating)
                | (Aggregating, Filtering)
                | (Filtering, Exporting)
                | (Exporting, Done)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Loading => "loading",
            PipelineState::Validating => "validating",
            PipelineState::Transforming => "transforming",
            PipelineState::Aggregating => "aggregating",
            PipelineState::Filtering => "filtering",
            PipelineState::Exporting => "exporting",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}
