// DedupIndex — run-scoped set of canonical identities.
//
// The primary harvester inserts into one shared index across every
// strategy/window combination; the fan-out step uses a fresh index per
// source. Merging happens on a single consumer task, so a plain HashSet
// suffices — no interior locking.

use std::collections::HashSet;

/// Tracks which canonical identities have already been emitted.
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identity. Returns false if it was already present,
    /// in which case the caller must skip the item.
    pub fn insert(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
