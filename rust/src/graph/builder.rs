//! Graph construction from a contract's dependency edges.
//!
//! The graph is stored in "what-depends-on-me" direction: each milestone maps
//! to the milestones that depend on it. Eliminating a node during Kahn's
//! algorithm then only touches its own dependents list. The reverse lists
//! (what each milestone depends on) are built in the same pass so blocker
//! queries are cheap in both directions.

use pyo3::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use crate::interner::{MilestoneIdInt, MilestoneInterner};
use crate::models::{DependencyEdge, Milestone};

use super::error::{GraphError, GraphResult};

/// Dependency graph for a single contract.
///
/// Node ids are interned in discovery order; that order drives every
/// deterministic iteration in the graph algorithms.
#[pyclass]
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    index: MilestoneInterner,
    /// dependency -> milestones that depend on it
    dependents: Vec<Vec<MilestoneIdInt>>,
    /// milestone -> milestones it depends on
    dependencies: Vec<Vec<MilestoneIdInt>>,
    edge_count: usize,
}

impl DependencyGraph {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            index: MilestoneInterner::with_capacity(capacity),
            dependents: Vec::with_capacity(capacity),
            dependencies: Vec::with_capacity(capacity),
            edge_count: 0,
        }
    }

    fn add_node(&mut self, id: &str) -> MilestoneIdInt {
        let (int_id, is_new) = self.index.intern(id);
        if is_new {
            self.dependents.push(Vec::new());
            self.dependencies.push(Vec::new());
        }
        int_id
    }

    fn add_edge(&mut self, dependency: MilestoneIdInt, dependent: MilestoneIdInt) {
        self.dependents[dependency as usize].push(dependent);
        self.dependencies[dependent as usize].push(dependency);
        self.edge_count += 1;
    }

    fn has_edge(&self, dependency: MilestoneIdInt, dependent: MilestoneIdInt) -> bool {
        self.dependents[dependency as usize].contains(&dependent)
    }

    /// Number of milestones in the graph.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of stored edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All milestone ids in discovery order.
    pub fn milestone_ids(&self) -> &[String] {
        self.index.names()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.get(id).is_some()
    }

    /// Milestones that directly depend on `id` (are blocked by it).
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|int_id| self.names_of(&self.dependents[int_id as usize]))
            .unwrap_or_default()
    }

    /// Milestones that `id` directly depends on (its blockers).
    pub fn dependencies(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|int_id| self.names_of(&self.dependencies[int_id as usize]))
            .unwrap_or_default()
    }

    /// Every milestone transitively blocked by `id`, in breadth-first order.
    pub fn downstream(&self, id: &str) -> Vec<String> {
        self.reachable(id, &self.dependents)
    }

    /// Every milestone that transitively blocks `id`, in breadth-first order.
    pub fn upstream(&self, id: &str) -> Vec<String> {
        self.reachable(id, &self.dependencies)
    }

    /// Milestones that are not completed and whose dependencies all are.
    ///
    /// Returned in discovery order.
    pub fn ready(&self, completed: &FxHashSet<String>) -> Vec<String> {
        self.index
            .names()
            .iter()
            .enumerate()
            .filter(|(_, name)| !completed.contains(name.as_str()))
            .filter(|(idx, _)| {
                self.dependencies[*idx]
                    .iter()
                    .all(|&dep| completed.contains(self.name(dep)))
            })
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub(crate) fn name(&self, id: MilestoneIdInt) -> &str {
        self.index.resolve(id).unwrap_or_default()
    }

    pub(crate) fn id_of(&self, name: &str) -> Option<MilestoneIdInt> {
        self.index.get(name)
    }

    pub(crate) fn dependents_of(&self, id: MilestoneIdInt) -> &[MilestoneIdInt] {
        &self.dependents[id as usize]
    }

    pub(crate) fn dependencies_of(&self, id: MilestoneIdInt) -> &[MilestoneIdInt] {
        &self.dependencies[id as usize]
    }

    fn names_of(&self, ids: &[MilestoneIdInt]) -> Vec<&str> {
        ids.iter().map(|&id| self.name(id)).collect()
    }

    fn reachable(&self, start: &str, edges: &[Vec<MilestoneIdInt>]) -> Vec<String> {
        let Some(start_id) = self.index.get(start) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.len()];
        let mut queue: VecDeque<MilestoneIdInt> =
            edges[start_id as usize].iter().copied().collect();
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            let idx = current as usize;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            result.push(self.name(current).to_string());

            for &next in &edges[idx] {
                if !visited[next as usize] {
                    queue.push_back(next);
                }
            }
        }

        result
    }
}

#[pymethods]
impl DependencyGraph {
    #[pyo3(name = "milestone_ids")]
    fn py_milestone_ids(&self) -> Vec<String> {
        self.index.names().to_vec()
    }

    #[pyo3(name = "dependents")]
    fn py_dependents(&self, id: &str) -> Vec<String> {
        self.dependents(id).into_iter().map(str::to_string).collect()
    }

    #[pyo3(name = "dependencies")]
    fn py_dependencies(&self, id: &str) -> Vec<String> {
        self.dependencies(id).into_iter().map(str::to_string).collect()
    }

    #[pyo3(name = "downstream")]
    fn py_downstream(&self, id: &str) -> Vec<String> {
        self.downstream(id)
    }

    #[pyo3(name = "upstream")]
    fn py_upstream(&self, id: &str) -> Vec<String> {
        self.upstream(id)
    }

    #[pyo3(name = "ready")]
    fn py_ready(&self, completed: Vec<String>) -> Vec<String> {
        self.ready(&completed.into_iter().collect())
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __contains__(&self, id: &str) -> bool {
        self.contains(id)
    }

    fn __repr__(&self) -> String {
        format!(
            "DependencyGraph(milestones={}, edges={})",
            self.len(),
            self.edge_count
        )
    }
}

/// Build the adjacency mapping for one contract's edges.
///
/// No validation happens here: self-loops and parallel edges are kept as
/// given and left for the cycle validator and scheduler to judge. Ids are
/// interned as they are first seen, the depended-upon id of each edge before
/// the dependent id.
pub fn build_graph(edges: &[DependencyEdge]) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(edges.len());
    for edge in edges {
        let dependency = graph.add_node(&edge.depends_on_id);
        let dependent = graph.add_node(&edge.milestone_id);
        graph.add_edge(dependency, dependent);
    }
    graph
}

/// Build the graph with every milestone seeded as a node, without validation.
///
/// Milestones are interned in `sequence` order first, then edges are added as
/// in [`build_graph`]: self-loops and parallel edges are kept, and ids outside
/// `milestones` become nodes of their own.
pub fn build_seeded_graph(edges: &[DependencyEdge], milestones: &[Milestone]) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(milestones.len() + edges.len());
    seed_milestones(&mut graph, milestones);

    for edge in edges {
        let dependency = graph.add_node(&edge.depends_on_id);
        let dependent = graph.add_node(&edge.milestone_id);
        graph.add_edge(dependency, dependent);
    }
    graph
}

fn seed_milestones(graph: &mut DependencyGraph, milestones: &[Milestone]) {
    let mut ordered: Vec<&Milestone> = milestones.iter().collect();
    ordered.sort_by_key(|m| m.sequence);
    for milestone in ordered {
        graph.add_node(&milestone.id);
    }
}

/// Build the graph, rejecting malformed edges.
///
/// Every milestone of the contract becomes a node, seeded in `sequence`
/// order, so isolated milestones still show up in an execution order and
/// ties resolve by sequence. Edges must join two of those milestones and may
/// not be self-loops. Parallel edges are collapsed.
pub fn build_validated_graph(
    edges: &[DependencyEdge],
    milestones: &[Milestone],
) -> GraphResult<DependencyGraph> {
    let mut graph = DependencyGraph::with_capacity(milestones.len());
    seed_milestones(&mut graph, milestones);

    for edge in edges {
        if edge.is_self_loop() {
            return Err(GraphError::self_dependency(&edge.milestone_id));
        }

        let lookup = |missing: &str| {
            graph.index.get(missing).ok_or_else(|| {
                GraphError::unknown_milestone(&edge.milestone_id, &edge.depends_on_id, missing)
            })
        };
        let dependency = lookup(edge.depends_on_id.as_str())?;
        let dependent = lookup(edge.milestone_id.as_str())?;

        if !graph.has_edge(dependency, dependent) {
            graph.add_edge(dependency, dependent);
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_edge(milestone: &str, depends_on: &str) -> DependencyEdge {
        DependencyEdge {
            milestone_id: milestone.to_string(),
            depends_on_id: depends_on.to_string(),
            dependency_type: "finish_to_start".to_string(),
        }
    }

    fn make_milestone(id: &str, sequence: i32) -> Milestone {
        Milestone {
            id: id.to_string(),
            contract_id: "c-1".to_string(),
            sequence,
            critical_path: false,
            estimated_duration: Duration::days(1),
            actual_duration: None,
            estimated_start: None,
            estimated_end: None,
            actual_start: None,
            actual_end: None,
        }
    }

    #[test]
    fn test_empty_edges_give_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_dependents_direction() {
        // b depends on a, c depends on a
        let graph = build_graph(&[make_edge("b", "a"), make_edge("c", "a")]);

        assert_eq!(graph.dependents("a"), vec!["b", "c"]);
        assert_eq!(graph.dependencies("b"), vec!["a"]);
        assert!(graph.dependents("b").is_empty());
        assert!(graph.dependents("missing").is_empty());
    }

    #[test]
    fn test_terminal_nodes_are_enumerated() {
        // "c" is never a dependency source, only a dependent
        let graph = build_graph(&[make_edge("b", "a"), make_edge("c", "b")]);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.milestone_ids(), &["a", "b", "c"]);
        assert!(graph.contains("c"));
    }

    #[test]
    fn test_malformed_edges_pass_through() {
        let graph = build_graph(&[make_edge("a", "a"), make_edge("b", "a"), make_edge("b", "a")]);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dependents("a"), vec!["a", "b", "b"]);
    }

    #[test]
    fn test_downstream_and_upstream() {
        // a -> b -> d, a -> c -> d, e isolated from a
        let graph = build_graph(&[
            make_edge("b", "a"),
            make_edge("c", "a"),
            make_edge("d", "b"),
            make_edge("d", "c"),
            make_edge("f", "e"),
        ]);

        assert_eq!(graph.downstream("a"), vec!["b", "c", "d"]);
        assert_eq!(graph.upstream("d"), vec!["b", "c", "a"]);
        assert!(graph.downstream("d").is_empty());
        assert_eq!(graph.upstream("f"), vec!["e"]);
        assert!(graph.upstream("unknown").is_empty());
    }

    #[test]
    fn test_ready_milestones() {
        let graph = build_graph(&[
            make_edge("b", "a"),
            make_edge("c", "a"),
            make_edge("d", "b"),
            make_edge("d", "c"),
        ]);

        let completed = FxHashSet::default();
        assert_eq!(graph.ready(&completed), vec!["a"]);

        let mut completed = FxHashSet::default();
        completed.insert("a".to_string());
        assert_eq!(graph.ready(&completed), vec!["b", "c"]);

        completed.insert("b".to_string());
        completed.insert("c".to_string());
        assert_eq!(graph.ready(&completed), vec!["d"]);
    }

    #[test]
    fn test_validated_graph_seeds_milestones_by_sequence() {
        let milestones = vec![
            make_milestone("handover", 3),
            make_milestone("kickoff", 1),
            make_milestone("audit", 2),
        ];
        let graph = build_validated_graph(&[make_edge("handover", "kickoff")], &milestones).unwrap();

        assert_eq!(graph.milestone_ids(), &["kickoff", "audit", "handover"]);
        assert_eq!(graph.dependents("kickoff"), vec!["handover"]);
    }

    #[test]
    fn test_validated_graph_rejects_self_loop() {
        let milestones = vec![make_milestone("a", 1)];
        let result = build_validated_graph(&[make_edge("a", "a")], &milestones);

        assert!(matches!(
            result,
            Err(GraphError::SelfDependency { milestone_id }) if milestone_id == "a"
        ));
    }

    #[test]
    fn test_validated_graph_rejects_unknown_milestone() {
        let milestones = vec![make_milestone("a", 1), make_milestone("b", 2)];
        let result = build_validated_graph(&[make_edge("b", "other_contract")], &milestones);

        assert_eq!(
            result.unwrap_err(),
            GraphError::unknown_milestone("b", "other_contract", "other_contract")
        );
    }

    #[test]
    fn test_seeded_graph_keeps_isolated_milestones_and_raw_edges() {
        let milestones = vec![
            make_milestone("b", 2),
            make_milestone("solo", 3),
            make_milestone("a", 1),
        ];
        let graph = build_seeded_graph(
            &[make_edge("b", "a"), make_edge("b", "a"), make_edge("b", "outside")],
            &milestones,
        );

        assert_eq!(graph.milestone_ids(), &["a", "b", "solo", "outside"]);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dependencies("b"), vec!["a", "a", "outside"]);
        assert_eq!(graph.ready(&FxHashSet::default()), vec!["a", "solo", "outside"]);
    }

    #[test]
    fn test_seeded_graph_keeps_self_loop() {
        let graph = build_seeded_graph(&[make_edge("a", "a")], &[make_milestone("a", 1)]);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.dependents("a"), vec!["a"]);
    }

    #[test]
    fn test_validated_graph_collapses_parallel_edges() {
        let milestones = vec![make_milestone("a", 1), make_milestone("b", 2)];
        let graph =
            build_validated_graph(&[make_edge("b", "a"), make_edge("b", "a")], &milestones).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependents("a"), vec!["b"]);
    }
}
