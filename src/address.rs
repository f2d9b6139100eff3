use crate::error::{Error, Result};
use crate::{MASK_OFFSET, MASK_PAGE};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// `LogicalAddress` holds the components of a trace entry in a single structure: the raw value as
/// read from the trace, plus the page number and offset decoded from its low 16 bits. Any bits
/// above the low 16 are carried along for reporting but never take part in translation.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct LogicalAddress {
    pub raw: u64,
    pub page: u8,
    pub offset: u8,
}

impl From<u64> for LogicalAddress {
    /// Provided a raw trace value, split it into page number and offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use paging_sim::address::LogicalAddress;
    /// let address = LogicalAddress::from(0x0f0f);
    /// assert_eq!(address.page, 15);
    /// assert_eq!(address.offset, 15);
    /// ```
    fn from(value: u64) -> Self {
        Self {
            raw: value,
            page: ((value & MASK_PAGE) >> 8) as u8,
            offset: (value & MASK_OFFSET) as u8,
        }
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// `TraceReader` sequentially obtains logical addresses from a text source holding one
/// non-negative decimal integer per line. Blank lines are skipped. The first line that does not
/// parse ends iteration with an `Error::TraceFormat` naming the line.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    pub line_number: u64,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl TraceReader<BufReader<File>> {
    /// Open the trace file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Io` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<LogicalAddress>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        loop {
            buffer.clear();
            match self.reader.read_line(&mut buffer) {
                Err(err) => return Some(Err(Error::Io(err))),
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let content = buffer.trim();
                    if content.is_empty() {
                        continue;
                    }
                    return Some(parse_address(content).ok_or_else(|| Error::TraceFormat {
                        line: self.line_number,
                        content: content.to_string(),
                    }));
                }
            }
        }
    }
}

// Digit strings too wide for a u64 wrap modulo 2^64, which leaves the low 16 bits intact.
fn parse_address(content: &str) -> Option<LogicalAddress> {
    if content.is_empty() || !content.bytes().all(|b| b.is_ascii_digit()) {
        return content.parse::<u64>().ok().map(LogicalAddress::from);
    }
    let raw = content.bytes().fold(0u64, |acc, digit| {
        acc.wrapping_mul(10).wrapping_add(u64::from(digit - b'0'))
    });
    Some(LogicalAddress::from(raw))
}

/// Read the entire trace at `path` into memory. Lookahead replacement needs the full trace before
/// the first translation, so every run materializes it up front.
///
/// # Errors
///
/// Fails on the first unreadable or malformed line.
pub fn load_trace(path: &Path) -> Result<Vec<LogicalAddress>> {
    TraceReader::open(path)?.collect()
}
