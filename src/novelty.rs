use std::collections::HashSet;

/// Remembers the titles of the last announced batch.
///
/// A batch is novel when it contains at least one title outside that set, so
/// a shrinking list is never re-announced but any new title is.
#[derive(Debug, Default)]
pub struct NoveltyTracker {
    seen: HashSet<String>,
}

impl NoveltyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_novel(&self, candidate: &HashSet<String>) -> bool {
        !candidate.is_subset(&self.seen)
    }

    /// Replaces the seen set wholesale.
    pub fn commit(&mut self, candidate: HashSet<String>) {
        self.seen = candidate;
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }
}
