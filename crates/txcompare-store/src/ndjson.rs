//! Streaming reader for `comparison.ndjson`.
//!
//! Lines are pulled one at a time into a reused buffer, so memory stays
//! bounded by the longest line. Blank lines are ignored. A line that does
//! not decode as a record yields `InvalidRecord` with its 1-based line
//! number and the stream carries on; a read failure yields `Io` and ends
//! the stream.

use crate::errors::{io_error, missing_job_file, stream_io, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use txcompare_core::errors::TxCompareError;
use txcompare_core::model::ComparisonRecord;

pub struct RecordReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
    done: bool,
}

impl RecordReader<BufReader<File>> {
    /// Open a record file.
    ///
    /// # Errors
    ///
    /// `ERR_NOT_FOUND` when the file does not exist, `ERR_IO` otherwise.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => missing_job_file(path),
            _ => io_error("open_input", e),
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = txcompare_core::Result<ComparisonRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    let text = trim_ascii(&self.buf);
                    if text.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_slice(text).map_err(|e| {
                        TxCompareError::InvalidRecord {
                            line: self.line,
                            reason: e.to_string(),
                        }
                    }));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(stream_io("read_input", e)));
                }
            }
        }
        None
    }
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
