//! Per-bar drag/resize/connect state machine.
//!
//! One gesture owns one [`DragSession`]; the session is created on
//! pointer-down, updated (preview only) on pointer-move, and consumed on
//! pointer-up or cancellation. Commits flow out through the mutation
//! ports; previews are returned as plain geometry for the renderer.

use crate::graph::TaskGraph;
use crate::model::{segments_are_disjoint, Segment, TimelineViewport};
use crate::ports::{DependencyMutationPort, TaskMutationPort};
use chrono::{Duration, NaiveDate};
use egui::{Modifiers, Pos2, Rect, Vec2};
use tracing::{debug, warn};
use uuid::Uuid;

/// What pointer-down landed on, as reported by the host's hit tester.
#[derive(Debug, Clone)]
pub struct BarHit {
    pub task_id: Uuid,
    /// The bar rect under the pointer. For split tasks, the rect of the
    /// segment that was hit.
    pub rect: Rect,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_milestone: bool,
    pub is_container: bool,
    /// Index of the hit segment when the task is split.
    pub segment_index: Option<usize>,
    /// Full segment list when the task is split; used to recompute the
    /// envelope on commit.
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
    Connect,
}

/// Transient state for one pointer gesture. Never persisted; dropped on
/// pointer-up or cancel.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub task_id: Uuid,
    pub mode: DragMode,
    pub origin_start: NaiveDate,
    pub origin_end: NaiveDate,
    pub origin_rect: Rect,
    pub pointer_down: Pos2,
    pub segment_index: Option<usize>,
    pub segments: Vec<Segment>,
}

/// Preview emitted on pointer-move while a session is active.
#[derive(Debug, Clone, PartialEq)]
pub struct DragUpdate {
    pub mode: DragMode,
    /// Snapped whole-day delta from the gesture's anchor.
    pub days_delta: i64,
    /// Ghost bar geometry at the would-be position.
    pub ghost: Rect,
    /// Live connect line (source right-center to pointer) in connect mode.
    pub connect_line: Option<(Pos2, Pos2)>,
}

/// A potential connect-drop destination under the pointer at release.
#[derive(Debug, Clone)]
pub struct DropTarget {
    pub task_id: Uuid,
    pub rect: Rect,
}

/// Result of consuming the session on pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// No session was active.
    Idle,
    /// Dates committed through the task port.
    DatesCommitted {
        task_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// One segment of a split task committed, with the recomputed envelope.
    SegmentCommitted {
        task_id: Uuid,
        segment_index: usize,
        segment: Segment,
        envelope: (NaiveDate, NaiveDate),
    },
    /// A validated edge was proposed through the dependency port.
    DependencyCreated { from: Uuid, to: Uuid },
    /// Connect released over nothing valid; no edge created.
    ConnectAborted,
    /// The gesture ended where it started; nothing committed.
    Unchanged,
    /// The commit would have been invalid; the bar keeps its last
    /// committed geometry.
    Reverted,
}

#[derive(Debug, Clone, Copy)]
pub struct DragConfig {
    /// Permit end == start on resize (zero-duration tasks). End < start is
    /// rejected either way.
    pub allow_zero_duration: bool,
    /// Tolerance around a drop target's bounding box for connect release.
    pub connect_padding: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            allow_zero_duration: false,
            connect_padding: 4.0,
        }
    }
}

/// Width of each resize grab zone as a function of bar width.
pub fn resize_zone_width(bar_width: f32) -> f32 {
    if bar_width >= 80.0 {
        20.0
    } else if bar_width >= 60.0 {
        15.0
    } else if bar_width >= 50.0 {
        12.0
    } else {
        10.0
    }
}

/// Resolve the gesture mode from the click position and modifiers.
///
/// Modifier overrides win: Shift forces connect, Ctrl/Cmd forces move,
/// Alt forces resize by clicked half. Otherwise the bar splits into a
/// left resize zone, a center move zone, and a right resize zone. Bars
/// under 50px fall back to quarter-width edge zones; under 40px the whole
/// bar moves and resizing needs the Alt override. Milestones have no
/// extent, so they only ever move or connect.
pub fn resolve_mode(rect: Rect, pointer: Pos2, modifiers: Modifiers, is_milestone: bool) -> DragMode {
    if modifiers.shift {
        return DragMode::Connect;
    }
    if modifiers.ctrl || modifiers.command {
        return DragMode::Move;
    }
    if is_milestone {
        return DragMode::Move;
    }
    if modifiers.alt {
        return if pointer.x < rect.center().x {
            DragMode::ResizeStart
        } else {
            DragMode::ResizeEnd
        };
    }
    let width = rect.width();
    if width < 40.0 {
        return DragMode::Move;
    }
    let zone = if width < 50.0 {
        width * 0.25
    } else {
        resize_zone_width(width)
    };
    if pointer.x <= rect.left() + zone {
        DragMode::ResizeStart
    } else if pointer.x >= rect.right() - zone {
        DragMode::ResizeEnd
    } else {
        DragMode::Move
    }
}

/// Snap a click on empty timeline to a date range for a dateless task.
pub fn place_on_timeline(
    pointer_x: f32,
    viewport: &TimelineViewport,
    duration_days: i64,
) -> (NaiveDate, NaiveDate) {
    let start = viewport.x_to_date(pointer_x);
    (start, start + Duration::days(duration_days.max(0)))
}

/// The drag state machine. Initial and terminal state is "no session".
#[derive(Debug, Default)]
pub struct DragStateMachine {
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragStateMachine {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Begin a gesture. Containers are not draggable on their own dates;
    /// a non-connect pointer-down on one is ignored.
    pub fn pointer_down(&mut self, hit: &BarHit, pointer: Pos2, modifiers: Modifiers) {
        let mode = resolve_mode(hit.rect, pointer, modifiers, hit.is_milestone);
        if hit.is_container && mode != DragMode::Connect {
            return;
        }
        self.session = Some(DragSession {
            task_id: hit.task_id,
            mode,
            origin_start: hit.start,
            origin_end: hit.end,
            origin_rect: hit.rect,
            pointer_down: pointer,
            segment_index: hit.segment_index,
            segments: hit.segments.clone(),
        });
    }

    /// Preview the gesture at the current pointer position. Pure with
    /// respect to committed state.
    pub fn pointer_move(&self, pointer: Pos2, viewport: &TimelineViewport) -> Option<DragUpdate> {
        let s = self.session.as_ref()?;
        let days = viewport.days_from_delta(pointer.x - s.pointer_down.x);
        let shift = viewport.width_of_days(days);
        let rect = s.origin_rect;
        let floor_px = if self.config.allow_zero_duration {
            0.0
        } else {
            viewport.pixels_per_day
        };
        let update = match s.mode {
            DragMode::Move => DragUpdate {
                mode: s.mode,
                days_delta: days,
                ghost: rect.translate(Vec2::new(shift, 0.0)),
                connect_line: None,
            },
            DragMode::ResizeStart => {
                // Past the opposite end the commit reverts, so the ghost
                // stays on the committed geometry instead of a clamped bar.
                let ghost = if s.origin_start + Duration::days(days) > s.origin_end {
                    rect
                } else {
                    let left = (rect.left() + shift).min(rect.right() - floor_px);
                    Rect::from_min_max(Pos2::new(left, rect.top()), rect.max)
                };
                DragUpdate {
                    mode: s.mode,
                    days_delta: days,
                    ghost,
                    connect_line: None,
                }
            }
            DragMode::ResizeEnd => {
                let ghost = if s.origin_end + Duration::days(days) < s.origin_start {
                    rect
                } else {
                    let right = (rect.right() + shift).max(rect.left() + floor_px);
                    Rect::from_min_max(rect.min, Pos2::new(right, rect.bottom()))
                };
                DragUpdate {
                    mode: s.mode,
                    days_delta: days,
                    ghost,
                    connect_line: None,
                }
            }
            DragMode::Connect => DragUpdate {
                mode: s.mode,
                days_delta: 0,
                ghost: rect,
                connect_line: Some((Pos2::new(rect.right(), rect.center().y), pointer)),
            },
        };
        Some(update)
    }

    /// End the gesture: validate, commit through the ports, and reset to
    /// the idle state. Dependents previewed by the cascade are not
    /// committed here — that remains the host's decision.
    pub fn pointer_up(
        &mut self,
        pointer: Pos2,
        viewport: &TimelineViewport,
        graph: &TaskGraph,
        drop_target: Option<&DropTarget>,
        task_port: &mut dyn TaskMutationPort,
        dep_port: &mut dyn DependencyMutationPort,
    ) -> DragOutcome {
        let Some(s) = self.session.take() else {
            return DragOutcome::Idle;
        };
        let days = viewport.days_from_delta(pointer.x - s.pointer_down.x);
        match s.mode {
            DragMode::Connect => self.finish_connect(&s, pointer, graph, drop_target, dep_port),
            DragMode::Move => {
                if days == 0 {
                    return DragOutcome::Unchanged;
                }
                if let Some(index) = s.segment_index.filter(|&i| i < s.segments.len()) {
                    let moved = s.segments[index].shifted(days);
                    return Self::commit_segment(&s, index, moved, task_port);
                }
                let start = s.origin_start + Duration::days(days);
                let end = s.origin_end + Duration::days(days);
                task_port.task_dates_changed(s.task_id, start, end);
                DragOutcome::DatesCommitted {
                    task_id: s.task_id,
                    start,
                    end,
                }
            }
            DragMode::ResizeStart => {
                if days == 0 {
                    return DragOutcome::Unchanged;
                }
                let raw = s.origin_start + Duration::days(days);
                if raw > s.origin_end {
                    warn!(task = %s.task_id, "resize rejected: start would pass end");
                    return DragOutcome::Reverted;
                }
                let start = raw.min(s.origin_end - Duration::days(self.min_duration_days()));
                // Resizing one segment of a split task never touches the
                // task's own dates; the envelope travels with the commit.
                if let Some(index) = s.segment_index.filter(|&i| i < s.segments.len()) {
                    let resized = Segment::new(start, s.segments[index].end);
                    return Self::commit_segment(&s, index, resized, task_port);
                }
                task_port.task_dates_changed(s.task_id, start, s.origin_end);
                DragOutcome::DatesCommitted {
                    task_id: s.task_id,
                    start,
                    end: s.origin_end,
                }
            }
            DragMode::ResizeEnd => {
                if days == 0 {
                    return DragOutcome::Unchanged;
                }
                let raw = s.origin_end + Duration::days(days);
                if raw < s.origin_start {
                    warn!(task = %s.task_id, "resize rejected: end would pass start");
                    return DragOutcome::Reverted;
                }
                let end = raw.max(s.origin_start + Duration::days(self.min_duration_days()));
                if let Some(index) = s.segment_index.filter(|&i| i < s.segments.len()) {
                    let resized = Segment::new(s.segments[index].start, end);
                    return Self::commit_segment(&s, index, resized, task_port);
                }
                task_port.task_dates_changed(s.task_id, s.origin_start, end);
                DragOutcome::DatesCommitted {
                    task_id: s.task_id,
                    start: s.origin_start,
                    end,
                }
            }
        }
    }

    /// Discard the session without committing anything: the Escape /
    /// released-outside-any-target path. Also clears any preview the host
    /// derived from it.
    pub fn cancel(&mut self) {
        if let Some(s) = self.session.take() {
            debug!(task = %s.task_id, "drag cancelled");
        }
    }

    fn min_duration_days(&self) -> i64 {
        if self.config.allow_zero_duration {
            0
        } else {
            1
        }
    }

    fn finish_connect(
        &self,
        s: &DragSession,
        pointer: Pos2,
        graph: &TaskGraph,
        drop_target: Option<&DropTarget>,
        dep_port: &mut dyn DependencyMutationPort,
    ) -> DragOutcome {
        if let Some(target) = drop_target {
            let hit = target.rect.expand(self.config.connect_padding).contains(pointer);
            if hit && target.task_id != s.task_id {
                if graph.validate_dependency(s.task_id, target.task_id) {
                    dep_port.dependency_created(s.task_id, target.task_id);
                    return DragOutcome::DependencyCreated {
                        from: s.task_id,
                        to: target.task_id,
                    };
                }
                debug!(from = %s.task_id, to = %target.task_id, "connect aborted: would cycle");
            }
        }
        DragOutcome::ConnectAborted
    }

    /// Commit one changed segment of a split task. The commit is rejected
    /// when the proposed segment would overlap a neighbor; segments stay
    /// sorted and disjoint.
    fn commit_segment(
        s: &DragSession,
        index: usize,
        proposed: Segment,
        task_port: &mut dyn TaskMutationPort,
    ) -> DragOutcome {
        let mut all = s.segments.clone();
        all[index] = proposed;
        all.sort_by_key(|seg| seg.start);
        if !segments_are_disjoint(&all) {
            warn!(task = %s.task_id, "segment commit rejected: would overlap a neighbor");
            return DragOutcome::Reverted;
        }
        let mut env_start = proposed.start;
        let mut env_end = proposed.end;
        for seg in &all {
            env_start = env_start.min(seg.start);
            env_end = env_end.max(seg.end);
        }
        task_port.segment_changed(s.task_id, index, proposed, (env_start, env_end));
        DragOutcome::SegmentCommitted {
            task_id: s.task_id,
            segment_index: index,
            segment: proposed,
            envelope: (env_start, env_end),
        }
    }
}
