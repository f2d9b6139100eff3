//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the resident page that has gone longest without an access. Recency is kept
//! in an intrusive doubly-linked list threaded through a fixed arena with one node per logical
//! page, so links are page numbers rather than pointers. The head is the most recently used page
//! and the tail the least.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_load()`: O(1)
//!   - `on_access()`: O(1)
//!   - `select_victim()`: O(1)
//! - **Space Complexity:** O(P) where P is the number of logical pages

use super::{ReplacementPolicy, VictimContext};
use crate::SIZE_TABLE;

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    prev: Option<u8>,
    next: Option<u8>,
    linked: bool,
}

/// LRU Policy state.
#[derive(Debug)]
pub struct LruPolicy {
    nodes: Vec<Node>,
    head: Option<u8>,
    tail: Option<u8>,
}

impl LruPolicy {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default(); SIZE_TABLE],
            head: None,
            tail: None,
        }
    }

    fn push_front(&mut self, page: u8) {
        let old_head = self.head;
        self.nodes[page as usize] = Node {
            prev: None,
            next: old_head,
            linked: true,
        };
        match old_head {
            Some(head) => self.nodes[head as usize].prev = Some(page),
            None => self.tail = Some(page),
        }
        self.head = Some(page);
    }

    fn unlink(&mut self, page: u8) {
        let node = self.nodes[page as usize];
        if !node.linked {
            return;
        }
        match node.prev {
            Some(prev) => self.nodes[prev as usize].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next as usize].prev = node.prev,
            None => self.tail = node.prev,
        }
        self.nodes[page as usize] = Node::default();
    }

    /// Pages from most to least recently used.
    pub fn order(&self) -> impl Iterator<Item = u8> + '_ {
        std::iter::successors(self.head, move |&page| self.nodes[page as usize].next)
    }
}

impl Default for LruPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for LruPolicy {
    fn on_load(&mut self, page: u8) {
        self.unlink(page);
        self.push_front(page);
    }

    /// Moves `page` to the head of the recency list.
    fn on_access(&mut self, page: u8) {
        if self.nodes[page as usize].linked && self.head != Some(page) {
            self.unlink(page);
            self.push_front(page);
        }
    }

    /// Unlinks and returns the tail, skipping any page no longer resident.
    fn select_victim(&mut self, context: &VictimContext<'_>) -> Option<u8> {
        while let Some(page) = self.tail {
            self.unlink(page);
            if context.pages.is_resident(page) {
                return Some(page);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::table::PageTable;

    fn resident(pages: &[u8]) -> PageTable {
        let mut table = PageTable::build();
        pages
            .iter()
            .enumerate()
            .for_each(|(frame, &page)| table.assign(page, frame));
        table
    }

    #[test]
    fn new() {
        let lru = LruPolicy::new();
        assert_eq!(lru.nodes.len(), SIZE_TABLE);
        assert_eq!(lru.order().count(), 0);
    }

    #[test]
    fn load_order_is_recency_order() {
        let mut lru = LruPolicy::new();
        [3, 1, 2].iter().for_each(|&p| lru.on_load(p));
        assert_eq!(lru.order().collect::<Vec<_>>(), vec![2, 1, 3]);
        assert_eq!(lru.tail, Some(3));
    }

    #[test]
    fn access_moves_to_head() {
        let mut lru = LruPolicy::new();
        [3, 1, 2].iter().for_each(|&p| lru.on_load(p));
        lru.on_access(3);
        assert_eq!(lru.order().collect::<Vec<_>>(), vec![3, 2, 1]);
        lru.on_access(2);
        assert_eq!(lru.order().collect::<Vec<_>>(), vec![2, 3, 1]);
        lru.on_access(2);
        assert_eq!(lru.order().collect::<Vec<_>>(), vec![2, 3, 1]);
        assert_eq!(lru.tail, Some(1));
    }

    #[test]
    fn access_of_unknown_page_is_ignored() {
        let mut lru = LruPolicy::new();
        lru.on_load(1);
        lru.on_access(200);
        assert_eq!(lru.order().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn evicts_least_recently_used() {
        let table = resident(&[10, 20, 30]);
        let context = VictimContext {
            pages: &table,
            upcoming: &[],
        };
        let mut lru = LruPolicy::new();
        [10, 20, 30].iter().for_each(|&p| lru.on_load(p));
        lru.on_access(10);

        assert_eq!(lru.select_victim(&context), Some(20));
        assert_eq!(lru.select_victim(&context), Some(30));
        assert_eq!(lru.select_victim(&context), Some(10));
        assert_eq!(lru.select_victim(&context), None);
        assert_eq!(lru.head, None);
    }

    #[test]
    fn skips_pages_no_longer_resident() {
        let table = resident(&[7]);
        let context = VictimContext {
            pages: &table,
            upcoming: &[],
        };
        let mut lru = LruPolicy::new();
        [9, 7].iter().for_each(|&p| lru.on_load(p));

        assert_eq!(lru.select_victim(&context), Some(7));
        assert_eq!(lru.order().count(), 0);
    }

    #[test]
    fn single_node_relinks() {
        let mut lru = LruPolicy::new();
        lru.on_load(4);
        lru.on_load(4);
        assert_eq!(lru.order().collect::<Vec<_>>(), vec![4]);
        assert_eq!(lru.head, Some(4));
        assert_eq!(lru.tail, Some(4));
    }
}
