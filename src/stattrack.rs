use std::fmt;
use std::ops::{Add, AddAssign};

/// Named counters collected by the translation engine over a run. They are mutated only while
/// translating and read once at the end to produce the summary.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct StatTracker {
    pub addresses_processed: usize,
    pub page_faults: usize,
    pub tlb_hits: usize,
    pub tlb_misses: usize,
}

impl StatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page faults per translated address, or `None` before anything was translated.
    pub fn page_fault_rate(&self) -> Option<f64> {
        ratio(self.page_faults, self.addresses_processed)
    }

    /// TLB hits divided by TLB misses (not by lookups). `None` when there were no misses.
    pub fn tlb_hit_rate(&self) -> Option<f64> {
        ratio(self.tlb_hits, self.tlb_misses)
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

struct Rate(Option<f64>);

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rate) => write!(f, "{:.3}", rate),
            None => f.write_str("undefined"),
        }
    }
}

impl Add<StatTracker> for StatTracker {
    type Output = StatTracker;

    fn add(self, rhs: StatTracker) -> Self::Output {
        Self::Output {
            addresses_processed: self.addresses_processed + rhs.addresses_processed,
            page_faults: self.page_faults + rhs.page_faults,
            tlb_hits: self.tlb_hits + rhs.tlb_hits,
            tlb_misses: self.tlb_misses + rhs.tlb_misses,
        }
    }
}

impl AddAssign for StatTracker {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.add(rhs)
    }
}

impl fmt::Display for StatTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Translated Addresses = {}", self.addresses_processed)?;
        writeln!(f, "Page Faults = {}", self.page_faults)?;
        writeln!(f, "Page Fault Rate = {}", Rate(self.page_fault_rate()))?;
        writeln!(f, "TLB Hits = {}", self.tlb_hits)?;
        writeln!(f, "TLB Misses = {}", self.tlb_misses)?;
        writeln!(f, "TLB Hit Rate = {}", Rate(self.tlb_hit_rate()))
    }
}
