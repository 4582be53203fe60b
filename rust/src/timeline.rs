//! Critical path / slack analysis over a contract's milestones.
//!
//! This is a linear scan in sequence order. The `critical_path` flag on each
//! milestone is taken as given; nothing here derives criticality from the
//! dependency graph (see [`crate::timing`] for that).

use chrono::Duration;
use pyo3::prelude::*;

use crate::models::Milestone;

/// Aggregate timing for one contract.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineAnalysis {
    /// Sum of all estimated durations.
    #[pyo3(get)]
    pub total_duration: Duration,
    /// Sum of estimated durations of milestones flagged critical.
    #[pyo3(get)]
    pub critical_path_duration: Duration,
    /// total_duration - critical_path_duration. Negative means the data is
    /// inconsistent, not that the analysis failed.
    #[pyo3(get)]
    pub slack: Duration,
    #[pyo3(get)]
    pub milestone_count: usize,
    #[pyo3(get)]
    pub critical_milestone_count: usize,
    #[pyo3(get)]
    pub completed_count: usize,
}

impl Default for TimelineAnalysis {
    fn default() -> Self {
        Self {
            total_duration: Duration::zero(),
            critical_path_duration: Duration::zero(),
            slack: Duration::zero(),
            milestone_count: 0,
            critical_milestone_count: 0,
            completed_count: 0,
        }
    }
}

#[pymethods]
impl TimelineAnalysis {
    /// True when critical-path durations exceed the total.
    pub fn has_negative_slack(&self) -> bool {
        self.slack < Duration::zero()
    }

    fn __repr__(&self) -> String {
        format!(
            "TimelineAnalysis(total={}, critical_path={}, slack={}, milestones={})",
            self.total_duration, self.critical_path_duration, self.slack, self.milestone_count
        )
    }
}

/// Compute total duration, critical-path duration and slack.
///
/// `milestones` is expected in `sequence` order. An empty slice yields an
/// all-zero analysis.
pub fn analyze_timeline(milestones: &[Milestone]) -> TimelineAnalysis {
    let mut analysis = TimelineAnalysis::default();

    for milestone in milestones {
        analysis.milestone_count += 1;
        analysis.total_duration = analysis.total_duration + milestone.estimated_duration;

        if milestone.critical_path {
            analysis.critical_milestone_count += 1;
            analysis.critical_path_duration =
                analysis.critical_path_duration + milestone.estimated_duration;
        }
        if milestone.is_completed() {
            analysis.completed_count += 1;
        }
    }

    analysis.slack = analysis.total_duration - analysis.critical_path_duration;
    analysis
}

/// Ids of milestones flagged critical, in the order given.
pub fn critical_milestones(milestones: &[Milestone]) -> Vec<String> {
    milestones
        .iter()
        .filter(|m| m.critical_path)
        .map(|m| m.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_milestone(id: &str, sequence: i32, duration: Duration, critical: bool) -> Milestone {
        Milestone {
            id: id.to_string(),
            contract_id: "c-1".to_string(),
            sequence,
            critical_path: critical,
            estimated_duration: duration,
            actual_duration: None,
            estimated_start: None,
            estimated_end: None,
            actual_start: None,
            actual_end: None,
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let analysis = analyze_timeline(&[]);
        assert_eq!(analysis, TimelineAnalysis::default());
        assert!(!analysis.has_negative_slack());
    }

    #[test]
    fn test_single_critical_milestone() {
        let milestones = vec![
            make_milestone("draft", 1, Duration::hours(1), false),
            make_milestone("review", 2, Duration::hours(2), true),
            make_milestone("sign", 3, Duration::hours(3), false),
        ];

        let analysis = analyze_timeline(&milestones);
        assert_eq!(analysis.total_duration, Duration::hours(6));
        assert_eq!(analysis.critical_path_duration, Duration::hours(2));
        assert_eq!(analysis.slack, Duration::hours(4));
        assert_eq!(analysis.milestone_count, 3);
        assert_eq!(analysis.critical_milestone_count, 1);
        assert_eq!(critical_milestones(&milestones), vec!["review"]);
    }

    #[test]
    fn test_all_critical_has_zero_slack() {
        let milestones = vec![
            make_milestone("a", 1, Duration::days(3), true),
            make_milestone("b", 2, Duration::days(4), true),
        ];

        let analysis = analyze_timeline(&milestones);
        assert_eq!(analysis.slack, Duration::zero());
        assert_eq!(analysis.total_duration, analysis.critical_path_duration);
    }

    #[test]
    fn test_negative_durations_surface_as_negative_slack() {
        // Bad data: a negative non-critical duration drags the total below the
        // critical sum. Reported, not rejected.
        let milestones = vec![
            make_milestone("a", 1, Duration::hours(5), true),
            make_milestone("b", 2, Duration::hours(-8), false),
        ];

        let analysis = analyze_timeline(&milestones);
        assert_eq!(analysis.slack, Duration::hours(-8));
        assert!(analysis.has_negative_slack());
    }

    #[test]
    fn test_slack_identity_is_exact() {
        let durations = [
            Duration::milliseconds(1),
            Duration::seconds(7),
            Duration::minutes(13),
            Duration::hours(29),
            Duration::days(3) + Duration::milliseconds(333),
        ];

        for critical_mask in 0u8..32 {
            let milestones: Vec<Milestone> = durations
                .iter()
                .enumerate()
                .map(|(i, &d)| {
                    make_milestone(&format!("m{i}"), i as i32, d, critical_mask & (1 << i) != 0)
                })
                .collect();

            let non_critical = milestones
                .iter()
                .filter(|m| !m.critical_path)
                .fold(Duration::zero(), |acc, m| acc + m.estimated_duration);

            let analysis = analyze_timeline(&milestones);
            assert_eq!(analysis.slack, non_critical);
            assert_eq!(
                analysis.slack,
                analysis.total_duration - analysis.critical_path_duration
            );
            assert_eq!(analysis.critical_milestone_count, critical_mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_completed_count() {
        let mut done = make_milestone("a", 1, Duration::days(1), false);
        done.actual_end = NaiveDate::from_ymd_opt(2025, 5, 1).and_then(|d| d.and_hms_opt(9, 0, 0));
        let milestones = vec![done, make_milestone("b", 2, Duration::days(1), false)];

        assert_eq!(analyze_timeline(&milestones).completed_count, 1);
    }
}
