use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One contiguous date range of a split task.
///
/// A task with segments is laid out and dragged per segment; its own
/// `start`/`end` are derived as the envelope across all segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Segment {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Shift both endpoints by a whole number of days.
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: self.start + chrono::Duration::days(days),
            end: self.end + chrono::Duration::days(days),
        }
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Coarse projection of `progress`. Display-oriented; never authoritative
/// over the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

/// A single task, milestone, or container in the Gantt tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// Unset until the task is first placed on the timeline.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Progress from 0 (not started) to 100 (complete).
    #[serde(default)]
    pub progress: u8,
    /// Predecessor task ids, finish-to-start semantics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Uuid>,
    /// Ordered children. A task with children is a container: its dates
    /// derive from the children and it is never dragged on its own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Task>,
    /// Non-overlapping date ranges of a split task, sorted by start.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
    /// If true, this is a milestone (zero-duration marker).
    #[serde(default)]
    pub is_milestone: bool,
    /// Bar color override (stored as RGBA). Unset tasks take the host
    /// theme's default.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "color_serde")]
    pub color: Option<Color32>,
}

impl Task {
    /// Create a new task with sensible defaults.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start: Some(start),
            end: Some(end),
            progress: 0,
            dependencies: Vec::new(),
            subtasks: Vec::new(),
            segments: Vec::new(),
            is_milestone: false,
            color: None,
        }
    }

    /// Create a new milestone.
    pub fn new_milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            is_milestone: true,
            ..Self::new(name, date, date)
        }
    }

    /// Create a task with no dates yet; it stays off the timeline until a
    /// click-to-place gesture emits a range for it.
    pub fn new_unscheduled(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start: None,
            end: None,
            progress: 0,
            dependencies: Vec::new(),
            subtasks: Vec::new(),
            segments: Vec::new(),
            is_milestone: false,
            color: None,
        }
    }

    pub fn is_container(&self) -> bool {
        !self.subtasks.is_empty()
    }

    pub fn status(&self) -> TaskStatus {
        match self.progress {
            0 => TaskStatus::Todo,
            100.. => TaskStatus::Completed,
            _ => TaskStatus::InProgress,
        }
    }

    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }

    /// `[min(segment.start), max(segment.end)]` across all segments, the
    /// bar used for layout and dependency anchors when the task is split.
    pub fn segment_envelope(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.segments.iter().map(|s| s.start).min()?;
        let end = self.segments.iter().map(|s| s.end).max()?;
        Some((start, end))
    }

    /// Sort segments by start and check the non-overlap invariant.
    /// Returns false when two sorted segments overlap.
    pub fn normalize_segments(&mut self) -> bool {
        self.segments.sort_by_key(|s| s.start);
        segments_are_disjoint(&self.segments)
    }

    /// Effective start date: container tasks derive from children,
    /// split tasks from their segment envelope.
    pub fn resolved_start(&self) -> Option<NaiveDate> {
        if self.is_container() {
            self.subtasks.iter().filter_map(|t| t.resolved_start()).min()
        } else if !self.segments.is_empty() {
            self.segment_envelope().map(|(s, _)| s)
        } else {
            self.start
        }
    }

    /// Effective end date, mirroring [`Task::resolved_start`].
    pub fn resolved_end(&self) -> Option<NaiveDate> {
        if self.is_container() {
            self.subtasks.iter().filter_map(|t| t.resolved_end()).max()
        } else if !self.segments.is_empty() {
            self.segment_envelope().map(|(_, e)| e)
        } else {
            self.end
        }
    }

    pub fn duration_days(&self) -> Option<i64> {
        match (self.resolved_start(), self.resolved_end()) {
            (Some(s), Some(e)) => Some((e - s).num_days()),
            _ => None,
        }
    }
}

/// Serde helper for the optional `Color32`, stored as an RGBA array.
mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Option<Color32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Skipped entirely when None; only reached with a value.
        let rgba = color.map(|c| [c.r(), c.g(), c.b(), c.a()]);
        rgba.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rgba: Option<[u8; 4]> = Deserialize::deserialize(deserializer)?;
        Ok(rgba.map(|[r, g, b, a]| Color32::from_rgba_premultiplied(r, g, b, a)))
    }
}

/// Whether segments sorted by start are pairwise non-overlapping.
/// Touching boundaries (`end == next.start`) are legal.
pub fn segments_are_disjoint(segments: &[Segment]) -> bool {
    segments.windows(2).all(|pair| pair[0].end <= pair[1].start)
}

/// Depth-first search of the tree for a task id.
pub fn find_task(tasks: &[Task], id: Uuid) -> Option<&Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable counterpart of [`find_task`].
pub fn find_task_mut(tasks: &mut [Task], id: Uuid) -> Option<&mut Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task_mut(&mut task.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Write derived dates back onto container tasks, children first, so the
/// stored tree matches what `resolved_start`/`resolved_end` report.
pub fn recalculate_container_dates(tasks: &mut [Task]) {
    for task in tasks {
        if task.is_container() {
            recalculate_container_dates(&mut task.subtasks);
            task.start = task.subtasks.iter().filter_map(|t| t.resolved_start()).min();
            task.end = task.subtasks.iter().filter_map(|t| t.resolved_end()).max();
        }
    }
}
