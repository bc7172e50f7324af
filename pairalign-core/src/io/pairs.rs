//! Paired-line sequence stream
//!
//! The input is a plain text stream in which every two consecutive lines form
//! one comparison: the first line is the query, the second the target. The
//! first byte of each line is a record marker (`>` / `<` in the usual
//! benchmark datasets) and is not part of the sequence.

use std::io::{self, BufRead};
use std::path::Path;

use super::open_input;

/// Two raw lines read from the stream, line terminators removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePair {
    query_line: Vec<u8>,
    target_line: Vec<u8>,
}

impl LinePair {
    pub fn new(query_line: Vec<u8>, target_line: Vec<u8>) -> Self {
        Self {
            query_line,
            target_line,
        }
    }

    /// Raw first line, marker byte included.
    pub fn query_line(&self) -> &[u8] {
        &self.query_line
    }

    /// Raw second line, marker byte included.
    pub fn target_line(&self) -> &[u8] {
        &self.target_line
    }

    /// Query symbols: the first line without its marker byte.
    pub fn query_sequence(&self) -> &[u8] {
        strip_marker(&self.query_line)
    }

    /// Target symbols: the second line without its marker byte.
    pub fn target_sequence(&self) -> &[u8] {
        strip_marker(&self.target_line)
    }
}

fn strip_marker(line: &[u8]) -> &[u8] {
    line.get(1..).unwrap_or(&[])
}

/// Reads query/target line pairs until the stream runs out.
///
/// A trailing line without a partner is dropped and reported as end of input.
pub struct PairReader<R> {
    reader: R,
    pairs_read: usize,
}

impl PairReader<Box<dyn BufRead>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(open_input(path)?))
    }
}

impl<R: BufRead> PairReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pairs_read: 0,
        }
    }

    /// Next pair, or `None` once either of the two lines hits end of stream.
    pub fn read_pair(&mut self) -> io::Result<Option<LinePair>> {
        let mut query_line = Vec::new();
        if !read_line(&mut self.reader, &mut query_line)? {
            return Ok(None);
        }

        let mut target_line = Vec::new();
        if !read_line(&mut self.reader, &mut target_line)? {
            log::debug!(
                "Discarding unpaired trailing line after {} pairs",
                self.pairs_read
            );
            return Ok(None);
        }

        self.pairs_read += 1;
        Ok(Some(LinePair::new(query_line, target_line)))
    }

    /// Number of complete pairs returned so far.
    pub fn pairs_read(&self) -> usize {
        self.pairs_read
    }
}

impl<R: BufRead> Iterator for PairReader<R> {
    type Item = io::Result<LinePair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_pair().transpose()
    }
}

/// Read one line into `buf` without its `\n` / `\r\n` terminator.
/// Returns `false` at end of stream.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}
