//! Live cascade preview: how dependents would shift if the drag committed.

use crate::graph::TaskGraph;
use crate::model::TimelineViewport;
use uuid::Uuid;

/// Screen-space preview rectangle for one dependent task. Consumed by the
/// presentation layer; committed task dates are never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEntry {
    pub task_id: Uuid,
    /// Snapped left edge of the shifted bar.
    pub preview_x: f32,
    /// Top of the bar band in the task's own row.
    pub y: f32,
    /// Bar width; the shift preserves duration, so this matches the
    /// committed bar.
    pub width: f32,
    pub days_delta: i64,
}

/// Compute preview positions for every transitive dependent of the task
/// being dragged.
///
/// Policy: uniform cascade. Each dependent shifts by exactly `days_delta`,
/// duration preserved, whether or not the shift is needed to keep the
/// finish-to-start constraint satisfied (no slack computation). Chosen for
/// predictability; a minimal-push policy would be a deliberate replacement,
/// not a local tweak.
///
/// A zero delta clears the preview. Dependents without resolved dates are
/// skipped — there is no bar to project. On pointer-up the host commits
/// only the dragged task's dates; applying the previewed shifts to
/// dependents is its own decision.
pub fn cascade_preview(
    graph: &TaskGraph,
    dragged_id: Uuid,
    days_delta: i64,
    viewport: &TimelineViewport,
) -> Vec<PreviewEntry> {
    if days_delta == 0 {
        return Vec::new();
    }
    graph
        .transitive_dependents(dragged_id)
        .into_iter()
        .filter_map(|flat| {
            let (start, end) = (flat.start?, flat.end?);
            let shifted_start = start + chrono::Duration::days(days_delta);
            Some(PreviewEntry {
                task_id: flat.id,
                preview_x: viewport.date_to_x(shifted_start),
                y: viewport.row_to_y(flat.row),
                width: viewport.width_of_days((end - start).num_days()),
                days_delta,
            })
        })
        .collect()
}
