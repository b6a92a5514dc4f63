use super::task::Task;

/// Default cap on retained undo snapshots.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo/redo history over whole-state snapshots.
///
/// `past` and `future` are owned stacks; `present` is the live value the
/// host reads. Every recorded mutation pushes the old present onto `past`
/// (discarding the oldest entry beyond the limit) and clears `future`.
/// Undo with an empty past and redo with an empty future are no-ops,
/// never errors.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    past: Vec<T>,
    present: T,
    future: Vec<T>,
    max_len: usize,
}

/// Snapshot history over the complete task tree.
pub type TaskHistory = History<Vec<Task>>;

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: T, max_len: usize) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            max_len: max_len.max(1),
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Commit a new state, recording the old one for undo.
    pub fn set_state(&mut self, value: T) {
        self.past.push(std::mem::replace(&mut self.present, value));
        if self.past.len() > self.max_len {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Replace the present without recording it — the path for
    /// housekeeping changes that must not be undoable.
    pub fn replace(&mut self, value: T) {
        self.present = value;
    }

    /// Edit the present in place without recording. Post-undo fixups
    /// (container date recalculation and the like) go through here so the
    /// replay itself never becomes a new history entry.
    pub fn amend(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.present);
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.past.pop() {
            Some(previous) => {
                self.future.push(std::mem::replace(&mut self.present, previous));
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.future.pop() {
            Some(next) => {
                self.past.push(std::mem::replace(&mut self.present, next));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of retained undo steps.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Drop both stacks, keeping the present value.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
