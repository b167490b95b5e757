//! Explicit timer handles for the recognizer
//!
//! The recognizer never reads a clock. It schedules deadlines here and the
//! host fires them by passing the current time to `pop_due`. Ids are never
//! reused, so a stale id can always be told apart from a live one.

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<K> {
    id: TimerId,
    deadline: u64,
    kind: K,
}

/// A timer whose deadline passed
#[derive(Debug, PartialEq, Eq)]
pub struct Expired<K> {
    pub id: TimerId,
    pub deadline: u64,
    pub kind: K,
}

#[derive(Debug)]
pub struct TimerQueue<K> {
    next_id: u64,
    entries: Vec<Entry<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, deadline: u64, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, deadline, kind });
        id
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove the earliest timer due at `now`. Equal deadlines come out in
    /// scheduling order.
    pub fn pop_due(&mut self, now: u64) -> Option<Expired<K>> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(pos, _)| pos)?;

        let entry = self.entries.remove(pos);
        Some(Expired {
            id: entry.id,
            deadline: entry.deadline,
            kind: entry.kind,
        })
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
}
