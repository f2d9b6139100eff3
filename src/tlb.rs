/// A single cached mapping from a logical page to the physical frame holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbEntry {
    pub page: u8,
    pub frame: usize,
}

/// The `TranslationCache` is a small virtualization of the translation look-aside buffer found in
/// CPUs. It is a fixed-capacity ring of slots with an eviction cursor: once every slot is in use,
/// an insert overwrites the slot under the cursor and advances it. Lookups never move an entry, so
/// replacement follows insertion order, not access recency.
///
/// While the ring is not full the cursor marks where the next insert goes, and when it is full
/// the cursor marks the oldest entry. Either way the entries read in ring order starting at the
/// cursor are oldest first.
#[derive(Debug)]
pub struct TranslationCache {
    capacity: usize,
    entries: Vec<TlbEntry>,
    cursor: usize,
}

impl TranslationCache {
    /// Create a new, empty cache able to hold `capacity` mappings.
    ///
    /// # Arguments
    ///
    /// * `capacity` - maximum number of entries held at once; zero is raised to one.
    pub fn build(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Search the cache for `page` and return its frame. A `None` value is a TLB miss; a miss
    /// leaves the cache untouched.
    pub fn lookup(&self, page: u8) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.page == page)
            .map(|entry| entry.frame)
    }

    /// Cache the mapping `page -> frame`. An existing entry for `page` is updated in place without
    /// changing its age. Otherwise the entry takes the slot under the cursor, which overwrites the
    /// oldest mapping when the ring is full.
    pub fn insert(&mut self, page: u8, frame: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.page == page) {
            entry.frame = frame;
            return;
        }

        if self.entries.len() == self.capacity {
            self.entries[self.cursor] = TlbEntry { page, frame };
        } else {
            self.entries.insert(self.cursor, TlbEntry { page, frame });
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Ensure no mapping for `page` remains. Returns whether an entry was removed. The cursor is
    /// pulled back when the removed slot sat before it so it keeps pointing at the same entry.
    pub fn remove(&mut self, page: u8) -> bool {
        match self.entries.iter().position(|entry| entry.page == page) {
            Some(index) => {
                let _ = self.entries.remove(index);
                if index < self.cursor {
                    self.cursor -= 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &TlbEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
