//! Per-contract milestone dependency graph.
//!
//! - [`build_graph`] / [`build_seeded_graph`] / [`build_validated_graph`]: edge
//!   list to adjacency
//! - [`is_acyclic`] / [`find_cycle`]: depth-first cycle validation
//! - [`topological_order`]: Kahn's algorithm execution order

mod builder;
mod cycle;
mod error;
mod topo;

pub use builder::{build_graph, build_seeded_graph, build_validated_graph, DependencyGraph};
pub use cycle::{find_cycle, is_acyclic};
pub use error::{GraphError, GraphResult};
pub use topo::topological_order;

pub(crate) use topo::topological_order_ids;
