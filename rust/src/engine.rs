//! Contract-level entry points: fetch a snapshot, build the graph, run the
//! algorithms.
//!
//! Every call reads a fresh snapshot from the store and builds its own graph,
//! so concurrent calls share nothing and store writes show up on the next
//! call.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::graph::{
    build_graph, build_seeded_graph, build_validated_graph, find_cycle, is_acyclic,
    topological_order, DependencyGraph, GraphError,
};
use crate::models::{DependencyEdge, Milestone};
use crate::store::{EdgeStore, StoreError};
use crate::timeline::{analyze_timeline, TimelineAnalysis};
use crate::timing::{milestone_timings, MilestoneTiming};
use crate::{log_checks, log_debug, log_summary};

/// Errors from engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("failed to load contract snapshot: {0}")]
    Store(#[from] StoreError),
    #[error("invalid dependency graph: {0}")]
    Graph(#[from] GraphError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Milestone dependency engine over an edge store.
pub struct DependencyEngine<S: EdgeStore> {
    store: S,
    config: EngineConfig,
}

impl<S: EdgeStore> DependencyEngine<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the contract's dependency graph from the current snapshot.
    ///
    /// With `strict_edges` the milestones are read in the same snapshot and
    /// malformed edges are rejected; otherwise the edges are used as stored.
    pub fn dependency_graph(&self, contract_id: &str) -> EngineResult<DependencyGraph> {
        if self.config.strict_edges {
            let (edges, milestones) = self.store.fetch_snapshot(contract_id)?;
            self.build_strict(contract_id, &edges, &milestones)
        } else {
            let graph = build_graph(&self.store.fetch_edges(contract_id)?);
            self.log_graph(contract_id, &graph);
            Ok(graph)
        }
    }

    /// True when the contract's dependencies contain no cycle.
    pub fn validate_dependencies(&self, contract_id: &str) -> EngineResult<bool> {
        let graph = self.dependency_graph(contract_id)?;
        let acyclic = is_acyclic(&graph);
        log_summary!(
            self.config.verbosity,
            "Contract {}: dependencies {}",
            contract_id,
            if acyclic { "acyclic" } else { "cyclic" }
        );
        if !acyclic {
            if let Some(cycle) = find_cycle(&graph) {
                log_checks!(self.config.verbosity, "  cycle: {}", cycle.join(" -> "));
            }
        }
        Ok(acyclic)
    }

    /// Legal execution order for the contract's milestones.
    pub fn execution_order(&self, contract_id: &str) -> EngineResult<Vec<String>> {
        let graph = self.dependency_graph(contract_id)?;
        match topological_order(&graph) {
            Ok(order) => {
                log_debug!(self.config.verbosity, "  order: {:?}", order);
                Ok(order)
            }
            Err(err) => {
                log_checks!(self.config.verbosity, "Contract {}: {}", contract_id, err);
                Err(err.into())
            }
        }
    }

    /// Total duration, critical-path duration and slack for the contract.
    pub fn timeline(&self, contract_id: &str) -> EngineResult<TimelineAnalysis> {
        let milestones = self.store.fetch_milestones_ordered(contract_id)?;
        let analysis = analyze_timeline(&milestones);
        log_summary!(
            self.config.verbosity,
            "Contract {}: total={} critical={} slack={}",
            contract_id,
            analysis.total_duration,
            analysis.critical_path_duration,
            analysis.slack
        );
        if analysis.has_negative_slack() {
            log_checks!(
                self.config.verbosity,
                "  negative slack: critical-path durations exceed the total"
            );
        }
        Ok(analysis)
    }

    /// Every milestone that must complete before `milestone_id` can.
    ///
    /// A milestone with no recorded edges has no blockers.
    pub fn blockers(&self, contract_id: &str, milestone_id: &str) -> EngineResult<Vec<String>> {
        Ok(self.dependency_graph(contract_id)?.upstream(milestone_id))
    }

    /// Every milestone held up until `milestone_id` completes.
    pub fn blocked_by(&self, contract_id: &str, milestone_id: &str) -> EngineResult<Vec<String>> {
        Ok(self.dependency_graph(contract_id)?.downstream(milestone_id))
    }

    /// Milestones that can start now: not completed, all dependencies completed.
    pub fn ready_milestones(&self, contract_id: &str) -> EngineResult<Vec<String>> {
        let (edges, milestones) = self.store.fetch_snapshot(contract_id)?;
        let graph = self.milestone_graph(contract_id, &edges, &milestones)?;

        let completed: FxHashSet<String> = milestones
            .iter()
            .filter(|m| m.is_completed())
            .map(|m| m.id.clone())
            .collect();
        let ready = graph.ready(&completed);
        log_summary!(
            self.config.verbosity,
            "Contract {}: {} completed, {} ready",
            contract_id,
            completed.len(),
            ready.len()
        );
        Ok(ready)
    }

    /// Earliest/latest windows and float for every milestone in the graph.
    pub fn milestone_timings(
        &self,
        contract_id: &str,
    ) -> EngineResult<Vec<(String, MilestoneTiming)>> {
        let (edges, milestones) = self.store.fetch_snapshot(contract_id)?;
        let graph = self.milestone_graph(contract_id, &edges, &milestones)?;

        let timings = milestone_timings(&graph, &milestones)?;
        // Report in graph order so callers get a stable sequence
        Ok(graph
            .milestone_ids()
            .iter()
            .filter_map(|id| timings.get(id).map(|t| (id.clone(), t.clone())))
            .collect())
    }

    /// Graph with every contract milestone as a node, validated or not per
    /// `strict_edges`.
    fn milestone_graph(
        &self,
        contract_id: &str,
        edges: &[DependencyEdge],
        milestones: &[Milestone],
    ) -> EngineResult<DependencyGraph> {
        if self.config.strict_edges {
            return self.build_strict(contract_id, edges, milestones);
        }
        let graph = build_seeded_graph(edges, milestones);
        self.log_graph(contract_id, &graph);
        Ok(graph)
    }

    fn build_strict(
        &self,
        contract_id: &str,
        edges: &[DependencyEdge],
        milestones: &[Milestone],
    ) -> EngineResult<DependencyGraph> {
        match build_validated_graph(edges, milestones) {
            Ok(graph) => {
                self.log_graph(contract_id, &graph);
                Ok(graph)
            }
            Err(err) => {
                log_checks!(
                    self.config.verbosity,
                    "Contract {}: rejected edges: {}",
                    contract_id,
                    err
                );
                Err(err.into())
            }
        }
    }

    fn log_graph(&self, contract_id: &str, graph: &DependencyGraph) {
        log_summary!(
            self.config.verbosity,
            "Contract {}: {} milestones, {} edges",
            contract_id,
            graph.len(),
            graph.edge_count()
        );
    }
}
