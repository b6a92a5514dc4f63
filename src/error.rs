use thiserror::Error;
use uuid::Uuid;

/// Typed failure results for dependency-graph mutation.
///
/// Graph operations return these as values rather than panicking so the
/// host can surface user-facing feedback (a toast, a status line) without
/// a catch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Adding the edge would make the dependency relation cyclic.
    #[error("dependency {from} -> {to} would create a cycle")]
    Cycle { from: Uuid, to: Uuid },

    /// A task can never depend on itself.
    #[error("task {0} cannot depend on itself")]
    SelfLoop(Uuid),
}
