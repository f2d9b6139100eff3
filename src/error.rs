use thiserror::Error;

/// Every failure the simulator can report. All of them are fatal to a run; the only recovery is
/// restarting with corrected input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("trace line {line}: {content:?} is not a non-negative integer")]
    TraceFormat { line: u64, content: String },

    #[error("backing store error: {0}")]
    BackingStore(String),

    #[error("validation line {line}: {content:?} is not a well-formed result line")]
    ValidationFormat { line: u64, content: String },

    // Raised when the engine's own bookkeeping disagrees with itself.
    #[error("inconsistent engine state: {0}")]
    Inconsistent(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
