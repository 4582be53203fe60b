//! Error types for graph construction and ordering.

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors reported by the graph builder and the topological scheduler.
///
/// A cycle found by [`crate::graph::is_acyclic`] is a plain `false` verdict;
/// only callers that need a total order get [`GraphError::CycleDetected`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// No total order exists; these milestones could not be resolved.
    #[error("cycle detected among {} unresolved milestones: {}", .unresolved.len(), .unresolved.join(", "))]
    CycleDetected { unresolved: Vec<String> },

    /// An edge points a milestone at itself.
    #[error("milestone '{milestone_id}' cannot depend on itself")]
    SelfDependency { milestone_id: String },

    /// An edge references a milestone that is not part of the contract.
    #[error("edge {milestone_id} -> {depends_on_id} references unknown milestone '{missing}'")]
    UnknownMilestone {
        milestone_id: String,
        depends_on_id: String,
        missing: String,
    },
}

impl GraphError {
    pub fn cycle(unresolved: Vec<String>) -> Self {
        Self::CycleDetected { unresolved }
    }

    pub fn self_dependency(milestone_id: impl Into<String>) -> Self {
        Self::SelfDependency {
            milestone_id: milestone_id.into(),
        }
    }

    pub fn unknown_milestone(
        milestone_id: impl Into<String>,
        depends_on_id: impl Into<String>,
        missing: impl Into<String>,
    ) -> Self {
        Self::UnknownMilestone {
            milestone_id: milestone_id.into(),
            depends_on_id: depends_on_id.into(),
            missing: missing.into(),
        }
    }
}
