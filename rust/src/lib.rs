//! Rust implementation of the contract milestone dependency engine.
//!
//! Builds per-contract dependency graphs, validates them for cycles, orders
//! milestones for execution and computes timeline slack. The graph and
//! timeline types are also exposed to Python.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use std::collections::HashMap;

mod config;
pub mod engine;
pub mod graph;
mod interner;
pub mod logging;
mod models;
pub mod store;
pub mod timeline;
pub mod timing;

pub use config::EngineConfig;
pub use engine::{DependencyEngine, EngineError, EngineResult};
pub use graph::{
    build_graph, build_seeded_graph, build_validated_graph, find_cycle, is_acyclic,
    topological_order, DependencyGraph, GraphError, GraphResult,
};
pub use models::{DependencyEdge, Milestone};
pub use store::{EdgeStore, InMemoryEdgeStore, StoreError};
pub use timeline::{analyze_timeline, critical_milestones, TimelineAnalysis};
pub use timing::{milestone_timings, MilestoneTiming};

/// Build a dependency graph from raw edges, without validation.
#[pyfunction]
#[pyo3(name = "build_graph")]
fn py_build_graph(edges: Vec<DependencyEdge>) -> DependencyGraph {
    build_graph(&edges)
}

/// Build a dependency graph seeded with every milestone of the contract.
///
/// # Raises
/// * ValueError on a self-loop or an edge to an unknown milestone
#[pyfunction]
#[pyo3(name = "build_validated_graph")]
fn py_build_validated_graph(
    edges: Vec<DependencyEdge>,
    milestones: Vec<Milestone>,
) -> PyResult<DependencyGraph> {
    build_validated_graph(&edges, &milestones)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

#[pyfunction]
#[pyo3(name = "is_acyclic")]
fn py_is_acyclic(graph: PyRef<'_, DependencyGraph>) -> bool {
    is_acyclic(&graph)
}

/// First cycle found, closed (first id repeated at the end), or None.
#[pyfunction]
#[pyo3(name = "find_cycle")]
fn py_find_cycle(graph: PyRef<'_, DependencyGraph>) -> Option<Vec<String>> {
    find_cycle(&graph)
}

/// Execution order for the graph.
///
/// # Returns
/// * `(order, True)` when the graph is acyclic
/// * `([], False)` when a cycle blocks some milestones
#[pyfunction]
#[pyo3(name = "topological_order")]
fn py_topological_order(graph: PyRef<'_, DependencyGraph>) -> (Vec<String>, bool) {
    match topological_order(&graph) {
        Ok(order) => (order, true),
        Err(_) => (Vec::new(), false),
    }
}

#[pyfunction]
#[pyo3(name = "analyze_timeline")]
fn py_analyze_timeline(milestones: Vec<Milestone>) -> TimelineAnalysis {
    analyze_timeline(&milestones)
}

/// Ids of the milestones flagged critical, in the order given.
#[pyfunction]
#[pyo3(name = "critical_milestones")]
fn py_critical_milestones(milestones: Vec<Milestone>) -> Vec<String> {
    critical_milestones(&milestones)
}

/// Earliest/latest windows and float per milestone.
///
/// # Raises
/// * ValueError if the graph is cyclic
#[pyfunction]
#[pyo3(name = "milestone_timings")]
fn py_milestone_timings(
    graph: PyRef<'_, DependencyGraph>,
    milestones: Vec<Milestone>,
) -> PyResult<HashMap<String, MilestoneTiming>> {
    match milestone_timings(&graph, &milestones) {
        Ok(timings) => Ok(timings.into_iter().collect()),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The contrack.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Milestone>()?;
    m.add_class::<DependencyEdge>()?;
    m.add_class::<DependencyGraph>()?;

    // Results
    m.add_class::<TimelineAnalysis>()?;
    m.add_class::<MilestoneTiming>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_build_graph, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_validated_graph, m)?)?;
    m.add_function(wrap_pyfunction!(py_is_acyclic, m)?)?;
    m.add_function(wrap_pyfunction!(py_find_cycle, m)?)?;
    m.add_function(wrap_pyfunction!(py_topological_order, m)?)?;
    m.add_function(wrap_pyfunction!(py_analyze_timeline, m)?)?;
    m.add_function(wrap_pyfunction!(py_critical_milestones, m)?)?;
    m.add_function(wrap_pyfunction!(py_milestone_timings, m)?)?;

    Ok(())
}
