//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the page that was loaded earliest, regardless of how often or how recently
//! it has been accessed since.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_load()`: O(1)
//!   - `select_victim()`: O(1) amortized
//! - **Space Complexity:** O(R) where R is the number of resident pages

use super::{ReplacementPolicy, VictimContext};
use linked_hash_map::LinkedHashMap;

/// FIFO Policy state.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    /// Resident pages in load order; the front is the oldest.
    queue: LinkedHashMap<u8, ()>,
}

impl FifoPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn on_load(&mut self, page: u8) {
        let _ = self.queue.insert(page, ());
    }

    /// Pops the queue until it reaches a page that is still resident.
    fn select_victim(&mut self, context: &VictimContext<'_>) -> Option<u8> {
        while let Some((page, ())) = self.queue.pop_front() {
            if context.pages.is_resident(page) {
                return Some(page);
            }
        }
        None
    }
}
