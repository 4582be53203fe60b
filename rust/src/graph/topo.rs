//! Execution order by in-degree elimination (Kahn's algorithm).
//!
//! 1. The node set is every interned id (keys and dependents alike)
//! 2. A node's in-degree is the number of edges pointing at it
//! 3. Zero in-degree nodes seed a FIFO queue, in discovery order
//! 4. Each popped node is appended to the order and its dependents, in stored
//!    list order, lose one in-degree; those reaching zero are enqueued
//! 5. Nodes left over when the queue empties sit on or behind a cycle

use std::collections::VecDeque;

use crate::interner::MilestoneIdInt;

use super::builder::DependencyGraph;
use super::error::{GraphError, GraphResult};

/// Returns a total order of the milestones that honours every edge.
///
/// Among milestones that become available together, discovery order wins.
/// Returns [`GraphError::CycleDetected`] listing the unresolved milestones if
/// no such order exists; a partial order is never returned.
pub fn topological_order(graph: &DependencyGraph) -> GraphResult<Vec<String>> {
    let order = topological_order_ids(graph)?;
    Ok(order
        .into_iter()
        .map(|id| graph.name(id).to_string())
        .collect())
}

pub(crate) fn topological_order_ids(graph: &DependencyGraph) -> GraphResult<Vec<MilestoneIdInt>> {
    let n = graph.len();

    let mut in_degree = vec![0usize; n];
    for node in 0..n as MilestoneIdInt {
        for &dependent in graph.dependents_of(node) {
            in_degree[dependent as usize] += 1;
        }
    }

    let mut queue: VecDeque<MilestoneIdInt> = (0..n as MilestoneIdInt)
        .filter(|&id| in_degree[id as usize] == 0)
        .collect();
    let mut order: Vec<MilestoneIdInt> = Vec::with_capacity(n);

    while let Some(node) = queue.pop_front() {
        order.push(node);

        for &dependent in graph.dependents_of(node) {
            let degree = &mut in_degree[dependent as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != n {
        let unresolved = (0..n as MilestoneIdInt)
            .filter(|&id| in_degree[id as usize] > 0)
            .map(|id| graph.name(id).to_string())
            .collect();
        return Err(GraphError::cycle(unresolved));
    }

    Ok(order)
}
