//! Linear undo history of encoded buffer snapshots.

/// One PNG-encoded copy of the buffer, taken when a stroke ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    pub fn new(png: Vec<u8>) -> Self {
        Self(png)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Ordered snapshot stack; the last entry mirrors the current buffer.
///
/// Bounded only by memory and never persisted. There is no redo: popped
/// entries are dropped.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot on top of the stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    /// Removes the most recent snapshot and returns the one now on top.
    ///
    /// Returns `None` when nothing was removed; `Some(None)` when the stack
    /// became empty.
    pub fn undo(&mut self) -> Option<Option<&Snapshot>> {
        self.entries.pop()?;
        Some(self.entries.last())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total encoded size of all snapshots.
    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(|s| s.0.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: u8) -> Snapshot {
        Snapshot::new(vec![tag; 4])
    }

    #[test]
    fn undo_on_empty_history_reports_nothing_removed() {
        let mut history = History::new();
        assert!(history.undo().is_none());
    }

    #[test]
    fn undo_exposes_previous_entry() {
        let mut history = History::new();
        history.push(snap(1));
        history.push(snap(2));

        assert_eq!(history.undo(), Some(Some(&snap(1))));
        assert_eq!(history.undo(), Some(None));
        assert!(history.is_empty());
    }

    #[test]
    fn total_bytes_sums_entries() {
        let mut history = History::new();
        history.push(snap(1));
        history.push(snap(2));
        assert_eq!(history.total_bytes(), 8);
        history.clear();
        assert_eq!(history.total_bytes(), 0);
    }
}
