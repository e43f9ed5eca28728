//! Dependency graph builder.
//!
//! Builds a DAG keyed by task id from the snapshot's tasks and typed
//! dependency edges. Construction validates structural integrity: self
//! dependencies and edges to unknown tasks are rejected immediately, and a
//! depth-first traversal with a recursion stack rejects cycles, reporting
//! the offending task ids in order.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{EngineError, Result};
use crate::model::{DependencyEdge, Task};

/// Directed acyclic graph of task dependencies.
///
/// Edges point from a task to the tasks it depends on (reverse adjacency);
/// `dependents` is the forward map. Tasks with no edges are kept as isolated
/// nodes.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    task_ids: Vec<String>,
    /// task id -> edges into its prerequisites
    dependencies: HashMap<String, Vec<DependencyEdge>>,
    /// task id -> ids of tasks that depend on it
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build and validate the graph.
    pub fn build(tasks: &[Task], edges: &[DependencyEdge]) -> Result<Self> {
        let known: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        let mut dependencies: HashMap<String, Vec<DependencyEdge>> = HashMap::new();
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for task in tasks {
            dependencies.entry(task.id.clone()).or_default();
            dependents.entry(task.id.clone()).or_default();
        }

        for edge in edges {
            if edge.task_id == edge.depends_on_id {
                return Err(EngineError::SelfDependency {
                    task_id: edge.task_id.clone(),
                });
            }
            for id in [&edge.task_id, &edge.depends_on_id] {
                if !known.contains(id.as_str()) {
                    return Err(EngineError::DanglingDependency {
                        from: edge.task_id.clone(),
                        to: id.clone(),
                    });
                }
            }
            dependencies
                .get_mut(&edge.task_id)
                .unwrap()
                .push(edge.clone());
            dependents
                .get_mut(&edge.depends_on_id)
                .unwrap()
                .push(edge.task_id.clone());
        }

        let graph = Self {
            task_ids: tasks.iter().map(|t| t.id.clone()).collect(),
            dependencies,
            dependents,
        };

        if let Some(cycle) = graph.find_cycle() {
            return Err(EngineError::CycleDetected { cycle });
        }

        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.task_ids.iter().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dependencies.contains_key(id)
    }

    /// Edges into the prerequisites of `id`.
    pub fn dependencies_of(&self, id: &str) -> &[DependencyEdge] {
        self.dependencies.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of tasks that depend on `id`.
    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks with no prerequisites.
    pub fn sources(&self) -> Vec<&str> {
        self.task_ids
            .iter()
            .filter(|id| self.dependencies_of(id).is_empty())
            .map(String::as_str)
            .collect()
    }

    /// Tasks nothing depends on.
    pub fn sinks(&self) -> Vec<&str> {
        self.task_ids
            .iter()
            .filter(|id| self.dependents_of(id).is_empty())
            .map(String::as_str)
            .collect()
    }

    /// Kahn's algorithm. The graph is validated acyclic at build time, so
    /// this always yields every task. Snapshot order breaks ties, which
    /// keeps downstream output deterministic.
    pub fn topological_order(&self) -> Vec<String> {
        let mut in_degree: HashMap<&str, usize> = self
            .task_ids
            .iter()
            .map(|id| (id.as_str(), self.dependencies_of(id).len()))
            .collect();

        let mut queue: VecDeque<&str> = self
            .task_ids
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree[id] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.task_ids.len());
        while let Some(id) = queue.pop_front() {
            order.push(id.to_string());
            for dependent in self.dependents_of(id) {
                let deg = in_degree.get_mut(dependent.as_str()).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(dependent);
                }
            }
        }
        order
    }

    /// DFS with an explicit recursion stack; a back edge closes the cycle,
    /// which is returned in dependency order starting at its entry point.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut on_stack: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();

        for start in &self.task_ids {
            if visited.contains(start.as_str()) {
                continue;
            }
            if let Some(cycle) = self.dfs(start, &mut visited, &mut on_stack, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs<'a>(
        &'a self,
        id: &'a str,
        visited: &mut HashSet<&'a str>,
        on_stack: &mut HashSet<&'a str>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        visited.insert(id);
        on_stack.insert(id);
        stack.push(id);

        for edge in self.dependencies_of(id) {
            let next = edge.depends_on_id.as_str();
            if on_stack.contains(next) {
                // Close the loop: everything from `next` to the top of the
                // stack participates in the cycle.
                let pos = stack.iter().position(|s| *s == next).unwrap();
                let mut cycle: Vec<String> = stack[pos..].iter().map(|s| s.to_string()).collect();
                cycle.push(next.to_string());
                return Some(cycle);
            }
            if !visited.contains(next) {
                if let Some(cycle) = self.dfs(next, visited, on_stack, stack) {
                    return Some(cycle);
                }
            }
        }

        on_stack.remove(id);
        stack.pop();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyType;

    fn make_tasks(ids: &[&str]) -> Vec<Task> {
        ids.iter().map(|id| Task::new(*id, *id)).collect()
    }

    #[test]
    fn test_build_empty_graph() {
        let graph = DependencyGraph::build(&[], &[]).unwrap();
        assert!(graph.is_empty());
        assert!(graph.topological_order().is_empty());
    }

    #[test]
    fn test_isolated_tasks_included() {
        let tasks = make_tasks(&["a", "b"]);
        let graph = DependencyGraph::build(&tasks, &[]).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.sources().len(), 2);
        assert_eq!(graph.sinks().len(), 2);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let tasks = make_tasks(&["a"]);
        let edges = vec![DependencyEdge::new("a", "a")];
        let err = DependencyGraph::build(&tasks, &edges).unwrap_err();
        assert_eq!(
            err,
            EngineError::SelfDependency {
                task_id: "a".to_string()
            }
        );
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let tasks = make_tasks(&["a"]);
        let edges = vec![DependencyEdge::new("a", "ghost")];
        let err = DependencyGraph::build(&tasks, &edges).unwrap_err();
        assert!(matches!(err, EngineError::DanglingDependency { to, .. } if to == "ghost"));
    }

    #[test]
    fn test_cycle_rejected_with_ordered_ids() {
        let tasks = make_tasks(&["a", "b", "c"]);
        let edges = vec![
            DependencyEdge::new("a", "b"),
            DependencyEdge::new("b", "c"),
            DependencyEdge::new("c", "a"),
        ];
        let err = DependencyGraph::build(&tasks, &edges).unwrap_err();
        match err {
            EngineError::CycleDetected { cycle } => {
                // Cycle must close on its entry node and contain all three.
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 4);
                for id in ["a", "b", "c"] {
                    assert!(cycle.contains(&id.to_string()), "missing {id} in {cycle:?}");
                }
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn test_two_node_cycle_rejected() {
        let tasks = make_tasks(&["x", "y"]);
        let edges = vec![DependencyEdge::new("x", "y"), DependencyEdge::new("y", "x")];
        assert!(matches!(
            DependencyGraph::build(&tasks, &edges),
            Err(EngineError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_cycle_detected_from_any_entry_point() {
        // The cycle sits behind a chain; DFS must still find it.
        let tasks = make_tasks(&["entry", "a", "b", "c"]);
        let edges = vec![
            DependencyEdge::new("entry", "a"),
            DependencyEdge::new("a", "b"),
            DependencyEdge::new("b", "c"),
            DependencyEdge::new("c", "a"),
        ];
        assert!(matches!(
            DependencyGraph::build(&tasks, &edges),
            Err(EngineError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_topological_order_respects_dependencies() {
        let tasks = make_tasks(&["a", "b", "c", "d"]);
        let edges = vec![
            DependencyEdge::new("b", "a"),
            DependencyEdge::new("c", "a").with_type(DependencyType::StartToStart),
            DependencyEdge::new("d", "b"),
            DependencyEdge::new("d", "c"),
        ];
        let graph = DependencyGraph::build(&tasks, &edges).unwrap();
        let order = graph.topological_order();
        assert_eq!(order.len(), 4);
        let pos = |id: &str| order.iter().position(|o| o == id).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
    }

    #[test]
    fn test_dependents_and_dependencies_maps() {
        let tasks = make_tasks(&["a", "b"]);
        let edges = vec![DependencyEdge::new("b", "a").with_lag(2)];
        let graph = DependencyGraph::build(&tasks, &edges).unwrap();
        assert_eq!(graph.dependents_of("a"), &["b".to_string()]);
        assert_eq!(graph.dependencies_of("b")[0].lag_days, 2);
        assert!(graph.dependencies_of("a").is_empty());
    }
}
