//! Configuration for the dependency engine.

use crate::logging::VERBOSITY_SILENT;

/// Engine behaviour switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Reject self-loops and edges to milestones outside the contract, and
    /// seed every contract milestone as a graph node. When false, edges are
    /// taken as stored.
    pub strict_edges: bool,
    /// Verbosity level: 0=silent, 1=summary, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_edges: true,
            verbosity: VERBOSITY_SILENT,
        }
    }
}

impl EngineConfig {
    /// Tolerant config: edges pass through unvalidated.
    pub fn tolerant() -> Self {
        Self {
            strict_edges: false,
            ..Self::default()
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert!(config.strict_edges);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_tolerant_keeps_verbosity_builder() {
        let config = EngineConfig::tolerant().with_verbosity(2);
        assert!(!config.strict_edges);
        assert_eq!(config.verbosity, 2);
    }
}
