//! Rolling observation history
//!
//! Fixed-capacity ring: slots are overwritten in place, the oldest entry is
//! evicted once the buffer is full.

use crate::HISTORY_CAPACITY;
use crate::types::Observation;

#[derive(Debug, Clone)]
pub struct History {
    slots: [Option<Observation>; HISTORY_CAPACITY],
    /// Next slot to write
    write_index: usize,
    len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            slots: [None; HISTORY_CAPACITY],
            write_index: 0,
            len: 0,
        }
    }

    /// Append, evicting the oldest entry when full
    pub fn push(&mut self, observation: Observation) {
        self.slots[self.write_index] = Some(observation);
        self.write_index = (self.write_index + 1) % HISTORY_CAPACITY;
        self.len = (self.len + 1).min(HISTORY_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        let start = (self.write_index + HISTORY_CAPACITY - self.len) % HISTORY_CAPACITY;
        (0..self.len).filter_map(move |i| self.slots[(start + i) % HISTORY_CAPACITY].as_ref())
    }

    /// The `n` most recent entries, oldest first. Fewer if history is shorter.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Observation> {
        self.iter().skip(self.len.saturating_sub(n))
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
