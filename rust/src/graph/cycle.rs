//! Cycle validation by depth-first search.
//!
//! Each node carries two markers: `visited` (global to the traversal) and
//! `on_stack` (cleared when the node's subtree is finished). Reaching a
//! dependent that is still on the stack means a back edge, so the graph is
//! cyclic. The traversal keeps its own frame stack instead of recursing, so a
//! long dependency chain cannot exhaust the call stack.

use crate::interner::MilestoneIdInt;

use super::builder::DependencyGraph;

/// A back edge found during traversal: the DFS path at the time, and the
/// on-stack node it points back to.
struct BackEdge {
    path: Vec<MilestoneIdInt>,
    target: MilestoneIdInt,
}

/// Returns true if the graph contains no cycle.
///
/// A cycle is a normal outcome here, not an error. Self-loops count as cycles.
pub fn is_acyclic(graph: &DependencyGraph) -> bool {
    find_back_edge(graph).is_none()
}

/// Returns the first cycle found, as milestone ids in dependency order with
/// the first id repeated at the end, or `None` if the graph is acyclic.
pub fn find_cycle(graph: &DependencyGraph) -> Option<Vec<String>> {
    let BackEdge { path, target } = find_back_edge(graph)?;
    let start = path.iter().position(|&id| id == target)?;

    let mut cycle: Vec<String> = path[start..]
        .iter()
        .map(|&id| graph.name(id).to_string())
        .collect();
    cycle.push(graph.name(target).to_string());
    Some(cycle)
}

/// Roots are tried in discovery order; the verdict does not depend on it.
fn find_back_edge(graph: &DependencyGraph) -> Option<BackEdge> {
    let n = graph.len();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    // (node, index of the next dependent to explore)
    let mut stack: Vec<(MilestoneIdInt, usize)> = Vec::new();

    for root in 0..n as MilestoneIdInt {
        if visited[root as usize] {
            continue;
        }
        visited[root as usize] = true;
        on_stack[root as usize] = true;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            match graph.dependents_of(node).get(next) {
                Some(&dependent) => {
                    frame.1 += 1;
                    let idx = dependent as usize;
                    if on_stack[idx] {
                        return Some(BackEdge {
                            path: stack.iter().map(|&(id, _)| id).collect(),
                            target: dependent,
                        });
                    }
                    if !visited[idx] {
                        visited[idx] = true;
                        on_stack[idx] = true;
                        stack.push((dependent, 0));
                    }
                }
                None => {
                    on_stack[node as usize] = false;
                    stack.pop();
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::models::DependencyEdge;

    fn make_edges(pairs: &[(&str, &str)]) -> Vec<DependencyEdge> {
        pairs
            .iter()
            .map(|(milestone, depends_on)| DependencyEdge {
                milestone_id: milestone.to_string(),
                depends_on_id: depends_on.to_string(),
                dependency_type: "finish_to_start".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_empty_graph_is_acyclic() {
        let graph = build_graph(&[]);
        assert!(is_acyclic(&graph));
        assert_eq!(find_cycle(&graph), None);
    }

    #[test]
    fn test_chain_is_acyclic() {
        let graph = build_graph(&make_edges(&[("b", "a"), ("c", "b")]));
        assert!(is_acyclic(&graph));
    }

    #[test]
    fn test_diamond_is_acyclic() {
        // Two paths reach d; d is visited twice but never while on the stack
        let graph = build_graph(&make_edges(&[("b", "a"), ("c", "a"), ("d", "b"), ("d", "c")]));
        assert!(is_acyclic(&graph));
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = build_graph(&make_edges(&[("a", "b"), ("b", "a")]));
        assert!(!is_acyclic(&graph));
        assert_eq!(
            find_cycle(&graph),
            Some(vec!["b".to_string(), "a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let graph = build_graph(&make_edges(&[("a", "a")]));
        assert!(!is_acyclic(&graph));
        assert_eq!(
            find_cycle(&graph),
            Some(vec!["a".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        // a -> b -> c -> d -> b
        let graph = build_graph(&make_edges(&[("b", "a"), ("c", "b"), ("d", "c"), ("b", "d")]));
        assert!(!is_acyclic(&graph));

        let cycle = find_cycle(&graph).unwrap();
        assert_eq!(cycle, vec!["b", "c", "d", "b"]);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let names: Vec<String> = (0..100_000).map(|i| format!("m{i}")).collect();
        let edges: Vec<DependencyEdge> = names
            .windows(2)
            .map(|pair| DependencyEdge {
                milestone_id: pair[1].clone(),
                depends_on_id: pair[0].clone(),
                dependency_type: "finish_to_start".to_string(),
            })
            .collect();

        let graph = build_graph(&edges);
        assert!(is_acyclic(&graph));
    }

    #[test]
    fn test_repeated_runs_agree() {
        let edges = make_edges(&[("b", "a"), ("c", "b"), ("a", "c")]);
        let first = build_graph(&edges);
        let second = build_graph(&edges);
        assert_eq!(is_acyclic(&first), is_acyclic(&second));
        assert_eq!(find_cycle(&first), find_cycle(&second));
    }
}
