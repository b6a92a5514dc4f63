//! Host-side mutation ports.
//!
//! The engine never holds a long-lived reference into the host's task
//! tree. Committed changes flow out through these traits, invoked exactly
//! once per committed gesture — never during preview.

use crate::model::Segment;
use chrono::NaiveDate;
use uuid::Uuid;

/// Receives committed date changes for individual tasks.
pub trait TaskMutationPort {
    /// A move, resize, or click-to-place commit for `task_id`.
    ///
    /// Precondition: `new_start <= new_end` (equal only when zero-duration
    /// tasks are enabled). Postcondition expected of the host: write the
    /// dates, recalculate container dates, snapshot history, rebuild the
    /// graph.
    fn task_dates_changed(&mut self, task_id: Uuid, new_start: NaiveDate, new_end: NaiveDate);

    /// A split-task drag commit: one segment moved, envelope recomputed
    /// across all segments including the moved one. The host writes the
    /// segment and sets the task's own dates to `envelope`.
    fn segment_changed(
        &mut self,
        task_id: Uuid,
        segment_index: usize,
        segment: Segment,
        envelope: (NaiveDate, NaiveDate),
    );
}

/// Receives committed dependency-edge changes.
pub trait DependencyMutationPort {
    /// A connect gesture landed on a valid target. The edge has already
    /// passed the cycle check; the host applies it (typically through
    /// `TaskGraph::add_dependency`) and persists.
    fn dependency_created(&mut self, from: Uuid, to: Uuid);

    /// The delete affordance on a connector was activated; the edge has
    /// already been removed via `TaskGraph::delete_dependency`. The host
    /// persists and snapshots history.
    fn dependency_removed(&mut self, from: Uuid, to: Uuid);
}
