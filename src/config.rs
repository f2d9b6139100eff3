use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::{DEFAULT_FRAMES, SIZE_TABLE};
use clap::Parser;
use log::debug;
use std::env;
use std::path::PathBuf;

/// Translate a trace of logical addresses through a simulated TLB, page table and frame pool.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Text file holding one logical address per line.
    pub trace_file: PathBuf,

    /// Number of physical frames, 1 to 256.
    #[arg(default_value_t = DEFAULT_FRAMES)]
    pub frames: usize,

    /// Page replacement algorithm.
    #[arg(value_enum, default_value_t = Policy::Fifo)]
    pub policy: Policy,

    /// Backing store image, exactly 65536 bytes.
    #[arg(long, default_value_t = env_or_default_str("SIM_FILE_STORAGE", "BACKING_STORE.bin"))]
    pub backing_store: String,

    /// Expected results to check every translation against.
    #[arg(long)]
    pub validate: Option<PathBuf>,

    /// Draw a progress bar on stderr.
    #[arg(long)]
    pub progress: bool,
}

impl Config {
    /// Configuration for `trace_file` with every other option at its default.
    pub fn new(trace_file: impl Into<PathBuf>) -> Self {
        Self {
            trace_file: trace_file.into(),
            frames: DEFAULT_FRAMES,
            policy: Policy::Fifo,
            backing_store: env_or_default_str("SIM_FILE_STORAGE", "BACKING_STORE.bin"),
            validate: None,
            progress: false,
        }
    }

    /// # Errors
    ///
    /// Fails with `Error::Configuration` if the frame count is outside `1..=256`.
    pub fn validate(&self) -> Result<()> {
        if self.frames == 0 || self.frames > SIZE_TABLE {
            return Err(Error::Configuration(format!(
                "'frames' must be between 1 and {}, got {}",
                SIZE_TABLE, self.frames
            )));
        }
        Ok(())
    }

    pub fn display(&self) {
        debug!("simulation configuration values: ");
        debug!("{:#?}", self);
    }
}

fn env_or_default_str(varname: &str, default: &str) -> String {
    match env::var(varname) {
        Ok(val) => val,
        _ => String::from(default),
    }
}
