//! Core data types for contract milestones and their dependencies.

use chrono::{Duration, NaiveDateTime};
use pyo3::prelude::*;

/// A directed dependency: `milestone_id` cannot be ready until `depends_on_id` completes.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyEdge {
    #[pyo3(get, set)]
    pub milestone_id: String,
    #[pyo3(get, set)]
    pub depends_on_id: String,
    /// Free-form classification; never interpreted by the graph algorithms.
    #[pyo3(get, set)]
    pub dependency_type: String,
}

#[pymethods]
impl DependencyEdge {
    #[new]
    #[pyo3(signature = (milestone_id, depends_on_id, dependency_type="finish_to_start".to_string()))]
    fn new(milestone_id: String, depends_on_id: String, dependency_type: String) -> Self {
        Self {
            milestone_id,
            depends_on_id,
            dependency_type,
        }
    }

    /// True when the edge points a milestone at itself.
    pub fn is_self_loop(&self) -> bool {
        self.milestone_id == self.depends_on_id
    }

    fn __repr__(&self) -> String {
        format!(
            "DependencyEdge(milestone_id={:?}, depends_on_id={:?}, type={:?})",
            self.milestone_id, self.depends_on_id, self.dependency_type
        )
    }
}

/// A trackable unit of contractual work.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Milestone {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub contract_id: String,
    /// Position within the contract; orders milestones and breaks ties.
    #[pyo3(get, set)]
    pub sequence: i32,
    #[pyo3(get, set)]
    pub critical_path: bool,
    #[pyo3(get, set)]
    pub estimated_duration: Duration,
    #[pyo3(get, set)]
    pub actual_duration: Option<Duration>,
    #[pyo3(get, set)]
    pub estimated_start: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    pub estimated_end: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    pub actual_start: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    pub actual_end: Option<NaiveDateTime>,
}

#[pymethods]
impl Milestone {
    #[new]
    #[pyo3(signature = (
        id,
        contract_id,
        sequence,
        estimated_duration,
        critical_path=false,
        actual_duration=None,
        estimated_start=None,
        estimated_end=None,
        actual_start=None,
        actual_end=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        contract_id: String,
        sequence: i32,
        estimated_duration: Duration,
        critical_path: bool,
        actual_duration: Option<Duration>,
        estimated_start: Option<NaiveDateTime>,
        estimated_end: Option<NaiveDateTime>,
        actual_start: Option<NaiveDateTime>,
        actual_end: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id,
            contract_id,
            sequence,
            critical_path,
            estimated_duration,
            actual_duration,
            estimated_start,
            estimated_end,
            actual_start,
            actual_end,
        }
    }

    /// A milestone counts as completed once its actual end is recorded.
    pub fn is_completed(&self) -> bool {
        self.actual_end.is_some()
    }

    fn __repr__(&self) -> String {
        format!(
            "Milestone(id={:?}, sequence={}, critical_path={}, estimated_duration={})",
            self.id, self.sequence, self.critical_path, self.estimated_duration
        )
    }
}
