pub mod address;
pub mod backing_store;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod stattrack;
pub mod table;
pub mod tlb;
pub mod validator;

use address::LogicalAddress;
use backing_store::BackingStore;
use config::Config;
use engine::TranslationEngine;
use error::Result;
use indicatif::ProgressBar;
use log::info;
use stattrack::StatTracker;
use std::fmt;
use std::io::Write;
use std::path::Path;
use validator::{ValidationEntry, ValidationTally};

pub use error::Error;
pub use policy::Policy;

pub const SIZE_TABLE: usize = 256;
pub const SIZE_TLB: usize = 16;
pub const SIZE_FRAME: usize = 256;
pub const SIZE_STORE: usize = SIZE_TABLE * SIZE_FRAME;
pub const DEFAULT_FRAMES: usize = SIZE_TABLE;
pub const MASK_PAGE: u64 = 0x0000FF00;
pub const MASK_OFFSET: u64 = 0x000000FF;

/// Content of one page or frame.
pub type FrameData = [u8; SIZE_FRAME];

/// A structure which contains the core elements required to run a simulation: the engine, the
/// fully materialized trace and, optionally, the results it is expected to produce.
#[derive(Debug)]
pub struct Simulation {
    engine: TranslationEngine,
    trace: Vec<LogicalAddress>,
    expected: Option<Vec<ValidationEntry>>,
    progress: bool,
}

/// Everything a finished run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub stats: StatTracker,
    pub validation: Option<ValidationTally>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stats)?;
        if let Some(tally) = &self.validation {
            write!(f, "{}", tally)?;
        }
        Ok(())
    }
}

impl Simulation {
    /// Load every input named by `config`. Nothing is translated yet.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, a missing or malformed backing store, an unreadable or
    /// malformed trace, or a malformed validation file.
    pub fn build(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = BackingStore::build(Path::new(&config.backing_store))?;
        let engine = TranslationEngine::build(config.frames, config.policy, store)?;
        let trace = address::load_trace(&config.trace_file)?;
        let expected = config
            .validate
            .as_deref()
            .map(validator::load_expected)
            .transpose()?;
        Ok(Self {
            engine,
            trace,
            expected,
            progress: config.progress,
        })
    }

    /// Assemble a simulation from parts already in memory.
    pub fn from_parts(engine: TranslationEngine, trace: Vec<LogicalAddress>) -> Self {
        Self {
            engine,
            trace,
            expected: None,
            progress: false,
        }
    }

    pub fn with_expected(mut self, expected: Vec<ValidationEntry>) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Translate the whole trace in order, writing one line per address to `out`.
    ///
    /// # Errors
    ///
    /// Fails if writing to `out` fails or the engine reports an inconsistency.
    pub fn run<W: Write>(self, out: &mut W) -> Result<Summary> {
        let Simulation {
            mut engine,
            trace,
            expected,
            progress,
        } = self;

        info!("translating {} addresses", trace.len());
        let bar = if progress {
            ProgressBar::new(trace.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        let mut tally = expected.as_ref().map(|_| ValidationTally::default());

        for (index, &address) in trace.iter().enumerate() {
            let translation = engine.translate(address, &trace[index + 1..])?;
            writeln!(out, "{}", translation)?;
            if let (Some(tally), Some(expected)) = (tally.as_mut(), expected.as_ref()) {
                tally.record(expected.get(index), &translation);
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        if let (Some(tally), Some(expected)) = (tally.as_mut(), expected.as_ref()) {
            tally.record_missing(expected.len().saturating_sub(trace.len()));
        }
        let stats = *engine.stats();
        info!(
            "done: {} page faults over {} addresses",
            stats.page_faults, stats.addresses_processed
        );
        Ok(Summary {
            stats,
            validation: tally,
        })
    }
}

/// Build and run the simulation described by `config`, writing translations to `out`.
///
/// # Errors
///
/// See [`Simulation::build`] and [`Simulation::run`].
pub fn run_simulation<W: Write>(config: &Config, out: &mut W) -> Result<Summary> {
    Simulation::build(config)?.run(out)
}
