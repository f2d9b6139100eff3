use crate::address::LogicalAddress;
use crate::engine::Translation;
use crate::error::{Error, Result};
use log::warn;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One expected result: the address translated and the signed value it should yield. Frames are
/// not compared; they vary with the replacement policy and frame count.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ValidationEntry {
    pub address: LogicalAddress,
    pub value: i8,
}

impl ValidationEntry {
    pub fn matches(&self, translation: &Translation) -> bool {
        self.address == translation.address && self.value == translation.value
    }
}

// Similar to `address::TraceReader`, `ValidationReader` reads expected results line by line. Two
// layouts are understood: this crate's own output lines (`16916, 0, 20, 0000...`) and the
// reference format `Virtual address: 16916 Physical address: 20 Value: 0`.
#[derive(Debug)]
pub struct ValidationReader<R> {
    reader: R,
    pub line_number: u64,
}

impl<R: BufRead> ValidationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }

    fn parse(&self, line: &str) -> Result<ValidationEntry> {
        let malformed = || Error::ValidationFormat {
            line: self.line_number,
            content: line.to_string(),
        };

        let (address, value) = if line.starts_with("Virtual address:") {
            let values = line.split_whitespace().collect::<Vec<&str>>();
            (values.get(2).copied(), values.get(7).copied())
        } else {
            let values = line.split(',').map(str::trim).collect::<Vec<&str>>();
            (values.first().copied(), values.get(1).copied())
        };

        Ok(ValidationEntry {
            address: LogicalAddress::from(
                address
                    .and_then(|v| v.parse::<u64>().ok())
                    .ok_or_else(malformed)?,
            ),
            value: value
                .and_then(|v| v.parse::<i8>().ok())
                .ok_or_else(malformed)?,
        })
    }
}

impl<R: BufRead> Iterator for ValidationReader<R> {
    type Item = Result<ValidationEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        loop {
            buffer.clear();
            match self.reader.read_line(&mut buffer) {
                Err(err) => return Some(Err(Error::Io(err))),
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = buffer.trim();
                    if !line.is_empty() {
                        return Some(self.parse(line));
                    }
                }
            }
        }
    }
}

/// Read every expected result from the file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or any line is malformed.
pub fn load_expected(path: &Path) -> Result<Vec<ValidationEntry>> {
    ValidationReader::new(BufReader::new(File::open(path)?)).collect()
}

/// Running comparison of translations against expected results.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ValidationTally {
    pub checked: usize,
    pub matched: usize,
}

impl ValidationTally {
    /// Compare one translation against its expected counterpart, if there is one.
    pub fn record(&mut self, expected: Option<&ValidationEntry>, received: &Translation) {
        self.checked += 1;
        match expected {
            Some(entry) if entry.matches(received) => self.matched += 1,
            Some(entry) => {
                warn!("expected: {:?}", entry);
                warn!("received: {} -> {}", received.address, received.value);
            }
            None => warn!("no expected result for {}", received.address),
        }
    }

    /// Count expected results that were never produced.
    pub fn record_missing(&mut self, count: usize) {
        if count > 0 {
            warn!("{} expected results had no translation", count);
        }
        self.checked += count;
    }

    pub fn is_clean(&self) -> bool {
        self.checked == self.matched
    }
}

impl fmt::Display for ValidationTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validated Translations = {}/{}", self.matched, self.checked)
    }
}
