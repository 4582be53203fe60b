//! Edge store interface consumed by the engine.
//!
//! Persistence lives outside this crate. The engine only needs a contract's
//! edges and milestones, described by [`EdgeStore`]. [`InMemoryEdgeStore`] holds
//! such a snapshot in memory for tests and for callers that already have the
//! rows loaded.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::models::{DependencyEdge, Milestone};

/// Errors surfaced by an edge store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("edge store not available: {0}")]
    NotAvailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Snapshot reads the graph engine needs from the persistence layer.
///
/// Implementations must be thread-safe. Retries and timeouts, if any, belong
/// to the implementation; the engine passes errors through unchanged.
///
/// The engine reads edges and milestones together through
/// [`EdgeStore::fetch_snapshot`]. The default implementation issues the two
/// reads back to back, so a write landing between them can pair edges with a
/// stale milestone set (for example an edge to a milestone created after the
/// milestone read, which the strict build rejects as unknown). Stores that can
/// read both in one transaction should override it.
pub trait EdgeStore: Send + Sync {
    /// All dependency edges recorded for the contract.
    fn fetch_edges(&self, contract_id: &str) -> Result<Vec<DependencyEdge>>;

    /// All milestones of the contract, ordered by `sequence`.
    fn fetch_milestones_ordered(&self, contract_id: &str) -> Result<Vec<Milestone>>;

    /// Edges and ordered milestones of the contract as one snapshot.
    fn fetch_snapshot(&self, contract_id: &str) -> Result<(Vec<DependencyEdge>, Vec<Milestone>)> {
        let milestones = self.fetch_milestones_ordered(contract_id)?;
        let edges = self.fetch_edges(contract_id)?;
        Ok((edges, milestones))
    }
}

// Allow type-erased stores
impl EdgeStore for Box<dyn EdgeStore> {
    fn fetch_edges(&self, contract_id: &str) -> Result<Vec<DependencyEdge>> {
        (**self).fetch_edges(contract_id)
    }

    fn fetch_milestones_ordered(&self, contract_id: &str) -> Result<Vec<Milestone>> {
        (**self).fetch_milestones_ordered(contract_id)
    }

    fn fetch_snapshot(&self, contract_id: &str) -> Result<(Vec<DependencyEdge>, Vec<Milestone>)> {
        (**self).fetch_snapshot(contract_id)
    }
}

/// Edge store backed by in-memory maps keyed by contract id.
///
/// Unknown contracts read as empty. [`InMemoryEdgeStore::unavailable`]
/// makes every read fail, for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEdgeStore {
    edges: FxHashMap<String, Vec<DependencyEdge>>,
    milestones: FxHashMap<String, Vec<Milestone>>,
    unavailable: bool,
}

impl InMemoryEdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail with [`StoreError::NotAvailable`].
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn set_available(&mut self, available: bool) {
        self.unavailable = !available;
    }

    /// Record a milestone under its own `contract_id`.
    pub fn add_milestone(&mut self, milestone: Milestone) {
        self.milestones
            .entry(milestone.contract_id.clone())
            .or_default()
            .push(milestone);
    }

    /// Record a dependency edge for a contract.
    pub fn add_edge(&mut self, contract_id: &str, edge: DependencyEdge) {
        self.edges
            .entry(contract_id.to_string())
            .or_default()
            .push(edge);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(StoreError::NotAvailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl EdgeStore for InMemoryEdgeStore {
    fn fetch_edges(&self, contract_id: &str) -> Result<Vec<DependencyEdge>> {
        self.check_available()?;
        Ok(self.edges.get(contract_id).cloned().unwrap_or_default())
    }

    fn fetch_milestones_ordered(&self, contract_id: &str) -> Result<Vec<Milestone>> {
        self.check_available()?;
        let mut milestones = self.milestones.get(contract_id).cloned().unwrap_or_default();
        milestones.sort_by_key(|m| m.sequence);
        Ok(milestones)
    }
}
