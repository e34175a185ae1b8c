use serde::Serialize;

/// Lifecycle of one query execution.
///
/// ```text
/// Created -> Dispatching -> Awaiting -> Completed
///                 |             '-----> TimedOut
///                 '-----> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Created,
    Dispatching,
    Awaiting,
    Completed,
    Failed,
    TimedOut,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Completed | ExecutionState::Failed | ExecutionState::TimedOut
        )
    }

    pub fn can_transition_to(&self, next: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (self, next),
            (Created, Dispatching)
                | (Dispatching, Awaiting)
                | (Dispatching, Failed)
                | (Awaiting, Completed)
                | (Awaiting, TimedOut)
        )
    }
}
