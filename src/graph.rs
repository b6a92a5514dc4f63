//! Dependency DAG over the flattened task tree, with cycle-safe mutation.

use crate::error::GraphError;
use crate::model::{find_task_mut, Task};
use crate::ports::DependencyMutationPort;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;
use uuid::Uuid;

/// One row of the flattened task tree: the fields the scheduler and the
/// interaction layer need, snapshotted at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTask {
    pub id: Uuid,
    /// Hierarchy depth (0 for top-level tasks).
    pub level: usize,
    /// Display row index in flattened order.
    pub row: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub is_container: bool,
    pub is_milestone: bool,
    pub dependencies: Vec<Uuid>,
}

/// Flatten the tree depth-first, preserving hierarchy order, and assign
/// row indices. Container and segment dates are resolved on the way.
pub fn flatten_tasks(tasks: &[Task]) -> Vec<FlatTask> {
    fn walk(tasks: &[Task], level: usize, out: &mut Vec<FlatTask>) {
        for task in tasks {
            out.push(FlatTask {
                id: task.id,
                level,
                row: out.len(),
                start: task.resolved_start(),
                end: task.resolved_end(),
                is_container: task.is_container(),
                is_milestone: task.is_milestone,
                dependencies: task.dependencies.clone(),
            });
            walk(&task.subtasks, level + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(tasks, 0, &mut out);
    out
}

/// The dependency graph derived from a task tree.
///
/// Edges run predecessor → dependent (finish-to-start). The graph never
/// holds a reference into the host's tree; it is rebuilt from the new tree
/// after every committed mutation, which also prunes edges of deleted
/// tasks. Dependencies naming an id absent from the flattened set are
/// inert: skipped during traversal, never an error.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    nodes: Vec<FlatTask>,
    index: HashMap<Uuid, usize>,
    dependents: HashMap<Uuid, Vec<Uuid>>,
}

impl TaskGraph {
    /// Build the graph from the current task tree.
    pub fn build(tasks: &[Task]) -> Self {
        let nodes = flatten_tasks(tasks);
        let index: HashMap<Uuid, usize> = nodes.iter().map(|n| (n.id, n.row)).collect();
        let mut dependents: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for node in &nodes {
            for dep in &node.dependencies {
                if !index.contains_key(dep) {
                    // Dangling reference: the host may clean up lazily.
                    continue;
                }
                let entry = dependents.entry(*dep).or_default();
                if !entry.contains(&node.id) {
                    entry.push(node.id);
                }
            }
        }
        Self {
            nodes,
            index,
            dependents,
        }
    }

    /// Rebuild in place from a new tree.
    pub fn rebuild(&mut self, tasks: &[Task]) {
        *self = Self::build(tasks);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn task(&self, id: Uuid) -> Option<&FlatTask> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// The flattened tasks in row order.
    pub fn tasks(&self) -> &[FlatTask] {
        &self.nodes
    }

    pub fn has_edge(&self, from: Uuid, to: Uuid) -> bool {
        self.dependents
            .get(&from)
            .is_some_and(|deps| deps.contains(&to))
    }

    /// Pure predicate: would `from -> to` be a legal new edge? Used by the
    /// UI to pre-empt invalid connect gestures before they are attempted.
    pub fn validate_dependency(&self, from: Uuid, to: Uuid) -> bool {
        from != to && !self.reaches(to, from)
    }

    /// Add a finish-to-start edge, rejecting self-loops and cycles before
    /// anything is mutated. On success the dependent task's `dependencies`
    /// list in `tasks` and the graph's adjacency are both updated; nothing
    /// is persisted — that is the host's responsibility. Adding an edge
    /// that already exists is a no-op.
    pub fn add_dependency(
        &mut self,
        tasks: &mut [Task],
        from: Uuid,
        to: Uuid,
    ) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        // A cycle would occur if `from` is already reachable from `to`.
        if self.reaches(to, from) {
            return Err(GraphError::Cycle { from, to });
        }

        if let Some(task) = find_task_mut(tasks, to) {
            if !task.dependencies.contains(&from) {
                task.dependencies.push(from);
            }
        }
        if let Some(&i) = self.index.get(&to) {
            if !self.nodes[i].dependencies.contains(&from) {
                self.nodes[i].dependencies.push(from);
            }
        }
        let entry = self.dependents.entry(from).or_default();
        if !entry.contains(&to) {
            entry.push(to);
        }
        debug!(%from, %to, "dependency added");
        Ok(())
    }

    /// Remove an edge. Idempotent: removing a non-existent edge is a no-op.
    /// Returns whether anything was removed.
    pub fn remove_dependency(&mut self, tasks: &mut [Task], from: Uuid, to: Uuid) -> bool {
        let mut removed = false;
        if let Some(task) = find_task_mut(tasks, to) {
            let before = task.dependencies.len();
            task.dependencies.retain(|&d| d != from);
            removed |= task.dependencies.len() != before;
        }
        if let Some(&i) = self.index.get(&to) {
            self.nodes[i].dependencies.retain(|&d| d != from);
        }
        if let Some(entry) = self.dependents.get_mut(&from) {
            let before = entry.len();
            entry.retain(|&d| d != to);
            removed |= entry.len() != before;
        }
        if removed {
            debug!(%from, %to, "dependency removed");
        }
        removed
    }

    /// The release half of the connector delete gesture: remove the edge
    /// and notify the host through the port. The affordance anchor itself
    /// comes from `PathDescriptor::closest_point`. The port fires only
    /// when an edge was actually removed.
    pub fn delete_dependency(
        &mut self,
        tasks: &mut [Task],
        from: Uuid,
        to: Uuid,
        dep_port: &mut dyn DependencyMutationPort,
    ) -> bool {
        let removed = self.remove_dependency(tasks, from, to);
        if removed {
            dep_port.dependency_removed(from, to);
        }
        removed
    }

    /// Direct dependents of a task: everything whose `dependencies`
    /// include it.
    pub fn dependents(&self, id: Uuid) -> Vec<&FlatTask> {
        self.dependents
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&d| self.task(d))
            .collect()
    }

    /// Breadth-first closure over [`TaskGraph::dependents`]. Each task is
    /// visited at most once, which also guards against revisiting if
    /// external data smuggled in a cycle the mutation path never saw.
    pub fn transitive_dependents(&self, id: Uuid) -> Vec<&FlatTask> {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<Uuid> = VecDeque::new();
        let mut out = Vec::new();
        visited.insert(id);
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(next) = self.dependents.get(&current) {
                for &dep in next {
                    if visited.insert(dep) {
                        if let Some(flat) = self.task(dep) {
                            out.push(flat);
                            queue.push_back(dep);
                        }
                    }
                }
            }
        }
        out
    }

    /// Whether `target` is reachable from `origin` along dependent edges.
    fn reaches(&self, origin: Uuid, target: Uuid) -> bool {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<Uuid> = VecDeque::new();
        queue.push_back(origin);
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(next) = self.dependents.get(&current) {
                for &dep in next {
                    if !visited.contains(&dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }
        false
    }

    /// Full topological audit of the no-cycle invariant (Kahn's algorithm).
    pub fn is_acyclic(&self) -> bool {
        let mut indegree: HashMap<Uuid, usize> =
            self.nodes.iter().map(|n| (n.id, 0)).collect();
        for (from, tos) in &self.dependents {
            if !self.index.contains_key(from) {
                continue;
            }
            for to in tos {
                if let Some(d) = indegree.get_mut(to) {
                    *d += 1;
                }
            }
        }
        let mut queue: VecDeque<Uuid> = indegree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut seen = 0usize;
        while let Some(current) = queue.pop_front() {
            seen += 1;
            if let Some(next) = self.dependents.get(&current) {
                for dep in next {
                    if let Some(d) = indegree.get_mut(dep) {
                        *d -= 1;
                        if *d == 0 {
                            queue.push_back(*dep);
                        }
                    }
                }
            }
        }
        seen == self.nodes.len()
    }
}
