//! Scheduling and interaction engine for embeddable Gantt-chart editors.
//!
//! The host UI owns the task tree and all rendering; this crate owns the
//! algorithms underneath it:
//!
//! - [`graph::TaskGraph`] — the dependency DAG with cycle-safe mutation
//!   and reachability queries.
//! - [`cascade::cascade_preview`] — live projection of how dependents
//!   would shift while a task is being dragged.
//! - [`connector::ConnectorRouter`] — deterministic, overlap-avoiding
//!   paths between two task bars.
//! - [`drag::DragStateMachine`] — pointer gestures to calendar dates,
//!   with day snapping and duration-preserving moves.
//! - [`model::History`] — bounded whole-tree undo/redo.
//!
//! Everything is single-threaded and synchronous: pointer handlers call
//! in with the current tree and get back values (or port calls) to apply.
//! The engine never keeps a mutable reference to host state.

pub mod cascade;
pub mod connector;
pub mod drag;
pub mod error;
pub mod graph;
pub mod model;
pub mod ports;

pub use cascade::{cascade_preview, PreviewEntry};
pub use connector::{
    BarGeometry, ConnectorRouter, LineStyle, NoBars, PathDescriptor, PathSegment,
};
pub use drag::{
    place_on_timeline, resolve_mode, BarHit, DragConfig, DragMode, DragOutcome, DragSession,
    DragStateMachine, DragUpdate, DropTarget,
};
pub use error::GraphError;
pub use graph::{flatten_tasks, FlatTask, TaskGraph};
pub use model::{
    find_task, find_task_mut, recalculate_container_dates, segments_are_disjoint, History,
    Segment, Task, TaskHistory, TaskStatus, TimelineViewport, DEFAULT_HISTORY_LIMIT,
};
pub use ports::{DependencyMutationPort, TaskMutationPort};
