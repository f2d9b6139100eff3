//! Page Replacement Policies.
//!
//! Selects the resident page to evict when a page fault occurs and every frame is in use.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out by load order.
//! - `Lru`: Least Recently Used.
//! - `Opt`: Belady's optimal policy, looking ahead through the remaining trace.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Optimal (lookahead) replacement policy.
pub mod opt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use opt::OptPolicy;

use crate::address::LogicalAddress;
use crate::error::{Error, Result};
use crate::table::PageTable;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// What a policy may consult when choosing a victim.
#[derive(Debug, Clone, Copy)]
pub struct VictimContext<'a> {
    /// The page table as it stands before the eviction.
    pub pages: &'a PageTable,
    /// Trace entries not yet translated, excluding the faulting one.
    pub upcoming: &'a [LogicalAddress],
}

/// Trait for page replacement policies.
///
/// The engine reports every load and every access; the policy keeps whatever bookkeeping it needs
/// and names a victim on demand.
pub trait ReplacementPolicy: fmt::Debug {
    /// Called whenever `page` becomes resident.
    fn on_load(&mut self, page: u8);

    /// Called after every successful translation of `page`, hit or fault.
    fn on_access(&mut self, _page: u8) {}

    /// Choose a resident page to evict. Only called when a fault occurs and no frame is free.
    ///
    /// # Returns
    ///
    /// The victim page, or `None` if the policy knows of no resident page.
    fn select_victim(&mut self, context: &VictimContext<'_>) -> Option<u8>;
}

/// The replacement algorithm chosen at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    Fifo,
    Lru,
    Opt,
}

impl Policy {
    /// Instantiate fresh bookkeeping for this policy.
    pub fn build(self) -> Box<dyn ReplacementPolicy> {
        match self {
            Policy::Fifo => Box::new(FifoPolicy::new()),
            Policy::Lru => Box::new(LruPolicy::new()),
            Policy::Opt => Box::new(OptPolicy),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Policy::Fifo),
            "lru" => Ok(Policy::Lru),
            "opt" => Ok(Policy::Opt),
            _ => Err(Error::Configuration(format!(
                "unknown replacement policy {:?}, expected one of fifo, lru, opt",
                s
            ))),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Fifo => "fifo",
            Policy::Lru => "lru",
            Policy::Opt => "opt",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn from_str() {
        assert_eq!("fifo".parse::<Policy>().unwrap(), Policy::Fifo);
        assert_eq!("LRU".parse::<Policy>().unwrap(), Policy::Lru);
        assert_eq!("opt".parse::<Policy>().unwrap(), Policy::Opt);
        assert!(matches!(
            "clock".parse::<Policy>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn display_round_trips_names() {
        for policy in [Policy::Fifo, Policy::Lru, Policy::Opt] {
            assert_eq!(policy.to_string().parse::<Policy>().unwrap(), policy);
        }
    }
}
