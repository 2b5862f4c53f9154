/// Maximum number of retained snapshots; the oldest is evicted beyond this.
pub const HISTORY_CAP: usize = 50;

/// Linear snapshot history with a cursor. Entries are value copies pushed
/// after each committed mutation; the seed entry is the state before the
/// first one, so undo from any point reverts exactly the last action.
#[derive(Clone, Debug)]
pub struct UndoHistory<T: Clone> {
    stack: Vec<T>,
    cursor: usize,
}

impl<T: Clone> UndoHistory<T> {
    pub fn new(initial: T) -> Self {
        Self {
            stack: vec![initial],
            cursor: 0,
        }
    }

    /// Pushes a snapshot at `cursor + 1`, discarding any redo branch and
    /// evicting the oldest entry once the cap is reached.
    pub fn push_snapshot(&mut self, value: T) {
        if self.cursor + 1 < self.stack.len() {
            self.stack.truncate(self.cursor + 1);
        }
        self.stack.push(value);
        if self.stack.len() > HISTORY_CAP {
            self.stack.remove(0);
        }
        self.cursor = self.stack.len() - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.stack.len()
    }

    pub fn undo(&mut self) -> Option<T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.stack[self.cursor].clone())
    }

    pub fn redo(&mut self) -> Option<T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.stack[self.cursor].clone())
    }

    /// Replaces the whole history with a fresh seed, e.g. for a new image.
    pub fn clear_with(&mut self, value: T) {
        self.stack.clear();
        self.stack.push(value);
        self.cursor = 0;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{UndoHistory, HISTORY_CAP};

    #[test]
    fn undo_redo_flow() {
        let mut history = UndoHistory::new(vec![1]);
        history.push_snapshot(vec![1, 2]);
        history.push_snapshot(vec![1, 2, 3]);

        assert_eq!(history.undo(), Some(vec![1, 2]));
        assert_eq!(history.undo(), Some(vec![1]));
        assert_eq!(history.undo(), None);

        assert_eq!(history.redo(), Some(vec![1, 2]));
        assert_eq!(history.redo(), Some(vec![1, 2, 3]));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn push_discards_redo_branch() {
        let mut history = UndoHistory::new(0);
        history.push_snapshot(1);
        history.push_snapshot(2);

        history.undo();
        history.undo();
        history.push_snapshot(9);

        assert_eq!(history.redo(), None);
        assert_eq!(history.undo(), Some(0));
    }

    #[test]
    fn cap_evicts_oldest_entries() {
        let mut history = UndoHistory::new(0);
        for value in 1..=60 {
            history.push_snapshot(value);
        }

        assert_eq!(history.len(), HISTORY_CAP);
        assert!(!history.can_redo());
        // Seed plus snapshots 1..=10 were evicted; the oldest survivor is 11.
        let mut oldest = None;
        while let Some(value) = history.undo() {
            oldest = Some(value);
        }
        assert_eq!(oldest, Some(11));
    }
}
