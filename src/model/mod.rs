pub mod history;
pub mod task;
pub mod timeline;

pub use history::{History, TaskHistory, DEFAULT_HISTORY_LIMIT};
pub use task::{
    find_task, find_task_mut, recalculate_container_dates, segments_are_disjoint, Segment, Task,
    TaskStatus,
};
pub use timeline::TimelineViewport;
