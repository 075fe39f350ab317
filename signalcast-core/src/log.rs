//! SignalLog — append-only, deduplicated, time-ordered event record.

use crate::domain::Signal;

/// Ordered record of every emitted signal. Entries are never removed or
/// mutated; a structurally identical candidate is silently rejected.
#[derive(Debug, Clone, Default)]
pub struct SignalLog {
    entries: Vec<Signal>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless an equal entry already exists.
    ///
    /// Returns true when the signal was newly appended; the caller notifies
    /// the distribution side exactly once per `true`.
    pub fn append(&mut self, candidate: Signal) -> bool {
        if self.entries.contains(&candidate) {
            return false;
        }
        self.entries.push(candidate);
        true
    }

    /// Full insertion-ordered history.
    pub fn history(&self) -> &[Signal] {
        &self.entries
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<&Signal> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
