use crate::address::LogicalAddress;
use crate::backing_store::BackingStore;
use crate::error::{Error, Result};
use crate::policy::{Policy, ReplacementPolicy, VictimContext};
use crate::stattrack::StatTracker;
use crate::table::{PageTable, PhysicalMemory};
use crate::tlb::TranslationCache;
use crate::{FrameData, SIZE_FRAME, SIZE_TABLE, SIZE_TLB};
use log::{debug, trace};
use std::fmt;

/// Where a translation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TlbHit,
    PageTableHit,
    /// The page had to be loaded from the backing store, displacing `evicted` if no frame was
    /// free.
    PageFault { evicted: Option<u8> },
}

/// The `Translation` encodes the result of translating one logical address: the signed byte found
/// there, the frame that held it, and a copy of that frame's content at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub address: LogicalAddress,
    pub value: i8,
    pub frame: usize,
    pub frame_bytes: FrameData,
    pub outcome: Outcome,
}

impl Translation {
    pub fn physical_address(&self) -> usize {
        self.frame * SIZE_FRAME + self.address.offset as usize
    }
}

impl fmt::Display for Translation {
    /// One output line: `address, value, frame, FRAME_CONTENT_AS_UPPERCASE_HEX`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, ", self.address, self.value, self.frame)?;
        for byte in self.frame_bytes.iter() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// The `TranslationEngine` ties the TLB, page table, physical memory, backing store and
/// replacement policy together. It owns all of that state exclusively and walks every address
/// through the same sequence: TLB, then page table, then fault handling with an eviction when no
/// frame is free. Page table, TLB and policy bookkeeping change in lock-step so that a TLB entry
/// never outlives the residency it caches.
#[derive(Debug)]
pub struct TranslationEngine {
    tlb: TranslationCache,
    pages: PageTable,
    frames: PhysicalMemory,
    store: BackingStore,
    policy: Box<dyn ReplacementPolicy>,
    tracker: StatTracker,
}

impl TranslationEngine {
    /// Create an engine with `frame_count` empty frames and the given replacement policy.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Configuration` if `frame_count` is outside `1..=256`.
    pub fn build(frame_count: usize, policy: Policy, store: BackingStore) -> Result<Self> {
        if !(1..=SIZE_TABLE).contains(&frame_count) {
            return Err(Error::Configuration(format!(
                "frame count {} is outside 1..={}",
                frame_count, SIZE_TABLE
            )));
        }
        debug!("engine: {} frames, {} replacement", frame_count, policy);
        Ok(Self {
            tlb: TranslationCache::build(SIZE_TLB),
            pages: PageTable::build(),
            frames: PhysicalMemory::build(frame_count),
            store,
            policy: policy.build(),
            tracker: StatTracker::new(),
        })
    }

    /// Translate `address` and return the byte it refers to. `upcoming` holds the trace entries
    /// after this one; only lookahead replacement consults it.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Inconsistent` if the engine's bookkeeping has been broken, e.g. the
    /// policy names a victim that is not resident.
    pub fn translate(
        &mut self,
        address: LogicalAddress,
        upcoming: &[LogicalAddress],
    ) -> Result<Translation> {
        self.tracker.addresses_processed += 1;
        let page = address.page;

        let (frame, outcome) = match self.tlb.lookup(page) {
            Some(frame) => {
                self.tracker.tlb_hits += 1;
                (frame, Outcome::TlbHit)
            }
            None => {
                self.tracker.tlb_misses += 1;
                match self.pages.frame_of(page) {
                    Some(frame) => {
                        self.tlb.insert(page, frame);
                        (frame, Outcome::PageTableHit)
                    }
                    None => {
                        self.tracker.page_faults += 1;
                        let evicted = self.make_room(upcoming)?;
                        (self.load(page)?, Outcome::PageFault { evicted })
                    }
                }
            }
        };
        self.policy.on_access(page);

        let frame_bytes = *self
            .frames
            .read(frame)
            .ok_or(Error::Inconsistent("translated to an empty frame"))?;
        trace!("{} -> frame {} ({:?})", address, frame, outcome);
        Ok(Translation {
            address,
            value: frame_bytes[address.offset as usize] as i8,
            frame,
            frame_bytes,
            outcome,
        })
    }

    /// Evict a victim if no frame is free. Returns the evicted page, if any.
    fn make_room(&mut self, upcoming: &[LogicalAddress]) -> Result<Option<u8>> {
        if self.frames.free_count() > 0 {
            return Ok(None);
        }

        let victim = self
            .policy
            .select_victim(&VictimContext {
                pages: &self.pages,
                upcoming,
            })
            .ok_or(Error::Inconsistent("no victim available with every frame in use"))?;
        let frame = self
            .pages
            .frame_of(victim)
            .ok_or(Error::Inconsistent("victim page is not resident"))?;

        self.frames.release(frame);
        self.pages.evict(victim);
        self.tlb.remove(victim);
        debug!("evicted page {} from frame {}", victim, frame);
        Ok(Some(victim))
    }

    /// Bring `page` in from the backing store and record it everywhere.
    fn load(&mut self, page: u8) -> Result<usize> {
        let frame = self
            .frames
            .load(self.store.page_data(page))
            .ok_or(Error::Inconsistent("no free frame after eviction"))?;
        self.pages.assign(page, frame);
        self.tlb.insert(page, frame);
        self.policy.on_load(page);
        Ok(frame)
    }

    /// Translate a whole trace in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failed translation.
    pub fn run(&mut self, trace: &[LogicalAddress]) -> Result<Vec<Translation>> {
        trace
            .iter()
            .enumerate()
            .map(|(index, &address)| self.translate(address, &trace[index + 1..]))
            .collect()
    }

    pub fn stats(&self) -> &StatTracker {
        &self.tracker
    }

    pub fn resident_count(&self) -> usize {
        self.pages.resident_count()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    /// Whether every TLB entry agrees with the page table and every resident page occupies a
    /// loaded frame of its own.
    pub fn is_consistent(&self) -> bool {
        let tlb_agrees = self
            .tlb
            .entries()
            .all(|entry| self.pages.frame_of(entry.page) == Some(entry.frame));

        let mut claimed = vec![false; self.frames.frame_count()];
        let frames_agree = self.pages.resident().all(|(_, frame)| {
            let loaded = self.frames.read(frame).is_some();
            let first_claim =
                frame < claimed.len() && !std::mem::replace(&mut claimed[frame], true);
            loaded && first_claim
        });

        let free_agrees = self.frames.free_count() + self.pages.resident_count()
            == self.frames.frame_count();

        tlb_agrees && frames_agree && free_agrees
    }
}
