use crate::{FrameData, SIZE_TABLE};
use std::ops::Index;

/// The simplest element of the page table: the frame a page lives in, if it lives in one at all.
/// Residency is derived from the frame so the two can never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    pub frame: Option<usize>,
}

impl PageTableEntry {
    pub fn resident(&self) -> bool {
        self.frame.is_some()
    }
}

/// The `PageTable` is the authoritative mapping from every logical page to its residency and
/// frame. It is a flat array with one entry per page, all of them non-resident at start.
#[derive(Debug)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    pub fn build() -> Self {
        Self {
            entries: vec![PageTableEntry::default(); SIZE_TABLE],
        }
    }

    pub fn is_resident(&self, page: u8) -> bool {
        self.entries[page as usize].resident()
    }

    /// Frame holding `page`, or `None` if the page is not resident.
    pub fn frame_of(&self, page: u8) -> Option<usize> {
        self.entries[page as usize].frame
    }

    /// Mark `page` resident in `frame`. The caller guarantees no other entry references `frame`.
    pub fn assign(&mut self, page: u8, frame: usize) {
        debug_assert!(
            self.resident().all(|(_, f)| f != frame),
            "frame {frame} is already referenced"
        );
        self.entries[page as usize].frame = Some(frame);
    }

    pub fn evict(&mut self, page: u8) {
        self.entries[page as usize].frame = None;
    }

    /// Every resident `(page, frame)` pair, in page order.
    pub fn resident(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(page, entry)| entry.frame.map(|frame| (page as u8, frame)))
    }

    pub fn resident_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.resident()).count()
    }
}

impl Index<u8> for PageTable {
    type Output = PageTableEntry;

    fn index(&self, page: u8) -> &Self::Output {
        &self.entries[page as usize]
    }
}

/// `PhysicalMemory` simulates the finite pool of frames available to hold pages. While there are
/// always as many pages as the address space allows, only `frame_count` of them can be resident at
/// once. Each slot is either empty or holds one page's bytes, replaced wholesale on every load.
#[derive(Debug)]
pub struct PhysicalMemory {
    slots: Vec<Option<Box<FrameData>>>,
    free: usize,
}

impl PhysicalMemory {
    /// Create a pool of `frame_count` empty frames.
    pub fn build(frame_count: usize) -> Self {
        Self {
            slots: (0..frame_count).map(|_| None).collect(),
            free: frame_count,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free
    }

    /// Copy `data` into the lowest-numbered empty frame and return its index. Returns `None` when
    /// every frame is occupied; callers evict first.
    pub fn load(&mut self, data: &FrameData) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(Box::new(*data));
        self.free -= 1;
        Some(index)
    }

    /// Empty the frame at `index`. Releasing an already empty frame does nothing.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.take().is_some() {
                self.free += 1;
            }
        }
    }

    /// Content of the frame at `index`, or `None` if it is empty or out of range.
    pub fn read(&self, index: usize) -> Option<&FrameData> {
        self.slots.get(index)?.as_deref()
    }
}
