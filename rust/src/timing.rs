//! Per-milestone float from forward and backward passes over the graph.
//!
//! Offsets are measured from the start of the contract. The forward pass walks
//! the topological order and takes each milestone's earliest start from the
//! latest earliest-finish among its dependencies. The backward pass walks the
//! reverse order and takes each latest finish from the earliest latest-start
//! among its dependents, anchored at the makespan.

use chrono::Duration;
use pyo3::prelude::*;
use rustc_hash::FxHashMap;

use crate::graph::{topological_order_ids, DependencyGraph, GraphResult};
use crate::models::Milestone;

/// Timing window for one milestone.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MilestoneTiming {
    #[pyo3(get)]
    pub earliest_start: Duration,
    #[pyo3(get)]
    pub earliest_finish: Duration,
    #[pyo3(get)]
    pub latest_start: Duration,
    #[pyo3(get)]
    pub latest_finish: Duration,
    /// latest_start - earliest_start
    #[pyo3(get)]
    pub total_float: Duration,
}

#[pymethods]
impl MilestoneTiming {
    /// Zero float: the milestone lies on a longest path.
    pub fn is_critical(&self) -> bool {
        self.total_float.is_zero()
    }

    fn __repr__(&self) -> String {
        format!(
            "MilestoneTiming(earliest_start={}, latest_start={}, total_float={})",
            self.earliest_start, self.latest_start, self.total_float
        )
    }
}

/// Compute earliest/latest windows and total float for every graph node.
///
/// Durations come from `milestones`; nodes without a matching milestone are
/// treated as zero-length. Fails with
/// [`crate::graph::GraphError::CycleDetected`] on cyclic graphs.
pub fn milestone_timings(
    graph: &DependencyGraph,
    milestones: &[Milestone],
) -> GraphResult<FxHashMap<String, MilestoneTiming>> {
    let order = topological_order_ids(graph)?;
    let n = graph.len();

    let mut durations = vec![Duration::zero(); n];
    for milestone in milestones {
        if let Some(id) = graph.id_of(&milestone.id) {
            durations[id as usize] = milestone.estimated_duration;
        }
    }

    // Forward pass
    let mut earliest_start = vec![Duration::zero(); n];
    let mut earliest_finish = vec![Duration::zero(); n];
    for &node in &order {
        let idx = node as usize;
        let start = graph
            .dependencies_of(node)
            .iter()
            .map(|&dep| earliest_finish[dep as usize])
            .max()
            .unwrap_or_else(Duration::zero);
        earliest_start[idx] = start;
        earliest_finish[idx] = start + durations[idx];
    }

    let makespan = earliest_finish
        .iter()
        .copied()
        .max()
        .unwrap_or_else(Duration::zero);

    // Backward pass
    let mut latest_start = vec![Duration::zero(); n];
    let mut latest_finish = vec![makespan; n];
    for &node in order.iter().rev() {
        let idx = node as usize;
        let finish = graph
            .dependents_of(node)
            .iter()
            .map(|&dependent| latest_start[dependent as usize])
            .min()
            .unwrap_or(makespan);
        latest_finish[idx] = finish;
        latest_start[idx] = finish - durations[idx];
    }

    Ok(order
        .into_iter()
        .map(|node| {
            let idx = node as usize;
            let timing = MilestoneTiming {
                earliest_start: earliest_start[idx],
                earliest_finish: earliest_finish[idx],
                latest_start: latest_start[idx],
                latest_finish: latest_finish[idx],
                total_float: latest_start[idx] - earliest_start[idx],
            };
            (graph.name(node).to_string(), timing)
        })
        .collect())
}
