//! Milestone id interning.
//!
//! Graph algorithms work on dense integer ids so adjacency, in-degree and
//! traversal markers can live in plain vectors. Ids are handed out in
//! discovery order, which is also the deterministic tie-break order used by
//! the topological scheduler.

use rustc_hash::FxHashMap;

/// Interned milestone id (u32 for compact adjacency lists).
pub type MilestoneIdInt = u32;

/// Maps milestone id strings to dense integers and back.
#[derive(Debug, Clone)]
pub struct MilestoneInterner {
    to_int: FxHashMap<String, MilestoneIdInt>,
    from_int: Vec<String>,
}

impl MilestoneInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Intern a milestone id, returning its integer id.
    ///
    /// The second element is true when the id was seen for the first time.
    pub fn intern(&mut self, s: &str) -> (MilestoneIdInt, bool) {
        if let Some(&id) = self.to_int.get(s) {
            return (id, false);
        }
        let id = self.from_int.len() as MilestoneIdInt;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), id);
        (id, true)
    }

    /// Get the integer id for a milestone, if it was interned.
    #[inline]
    pub fn get(&self, s: &str) -> Option<MilestoneIdInt> {
        self.to_int.get(s).copied()
    }

    /// Get the milestone id for an integer id.
    #[inline]
    pub fn resolve(&self, id: MilestoneIdInt) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }

    /// All interned milestone ids in discovery order.
    pub fn names(&self) -> &[String] {
        &self.from_int
    }

    /// Number of interned ids.
    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for MilestoneInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = MilestoneInterner::with_capacity(4);

        let (id1, new1) = interner.intern("design_review");
        let (id2, new2) = interner.intern("prototype");
        let (id3, new3) = interner.intern("design_review");

        assert_eq!(id1, id3);
        assert_ne!(id1, id2);
        assert!(new1 && new2);
        assert!(!new3);

        assert_eq!(interner.resolve(id1), Some("design_review"));
        assert_eq!(interner.resolve(id2), Some("prototype"));
        assert_eq!(interner.get("prototype"), Some(id2));
        assert_eq!(interner.get("nonexistent"), None);
        assert_eq!(interner.resolve(99), None);
    }

    #[test]
    fn test_discovery_order() {
        let mut interner = MilestoneInterner::default();
        assert!(interner.is_empty());

        interner.intern("c");
        interner.intern("a");
        interner.intern("c");
        interner.intern("b");

        assert_eq!(interner.names(), &["c", "a", "b"]);
        assert_eq!(interner.len(), 3);
    }
}
