//! Optimal (OPT) Replacement Policy.
//!
//! Belady's policy: evict the resident page whose next reference lies farthest in the future.
//! A resident page that is never referenced again is evicted at once; among several such pages
//! the first in page-table order wins. This needs the whole trace up front and rescans the
//! remaining suffix on every fault.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `select_victim()`: O(R × T) where R is the resident count and T the remaining trace length
//! - **Space Complexity:** O(1)

use super::{ReplacementPolicy, VictimContext};

/// OPT Policy state. It keeps none; every decision is recomputed from the trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptPolicy;

impl ReplacementPolicy for OptPolicy {
    fn on_load(&mut self, _page: u8) {}

    fn select_victim(&mut self, context: &VictimContext<'_>) -> Option<u8> {
        let mut victim: Option<(u8, usize)> = None;
        for (page, _) in context.pages.resident() {
            let next_use = context
                .upcoming
                .iter()
                .position(|address| address.page == page);
            match next_use {
                None => return Some(page),
                Some(distance) => {
                    if victim.map_or(true, |(_, farthest)| distance > farthest) {
                        victim = Some((page, distance));
                    }
                }
            }
        }
        victim.map(|(page, _)| page)
    }
}
