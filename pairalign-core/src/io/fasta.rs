//! Multi-record FASTA parser
//!
//! A byte-level state machine over the whole stream. Header lines mark record
//! boundaries and supply record names; every other byte except line
//! terminators is a residue appended to the current record, so multi-line
//! sequences are concatenated transparently.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::open_input;
use crate::types::Record;

const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Outside any record: at stream start or right after a header line.
    Seeking,
    /// Between `>` and the end of its line.
    InHeader,
    /// Appending residues to the last record.
    InBody,
}

/// Incremental parser; feed it chunks in file order.
#[derive(Debug)]
struct FastaStateMachine {
    state: ParseState,
    pending_name: Vec<u8>,
    records: Vec<Record>,
}

impl FastaStateMachine {
    fn new() -> Self {
        Self {
            state: ParseState::Seeking,
            pending_name: Vec::new(),
            records: Vec::new(),
        }
    }

    fn feed(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            self.step(byte);
        }
    }

    fn step(&mut self, byte: u8) {
        match self.state {
            ParseState::InHeader => match byte {
                b'\n' => self.state = ParseState::Seeking,
                b'\r' => {}
                _ => self.pending_name.push(byte),
            },
            ParseState::Seeking | ParseState::InBody => match byte {
                b'>' => {
                    self.state = ParseState::InHeader;
                    self.pending_name.clear();
                }
                b'\r' | b'\n' => {}
                _ => {
                    if self.state == ParseState::Seeking {
                        let name = String::from_utf8_lossy(&self.pending_name).into_owned();
                        self.pending_name.clear();
                        self.records.push(Record::new(name));
                        self.state = ParseState::InBody;
                    }
                    if let Some(record) = self.records.last_mut() {
                        record.sequence.push(byte);
                    }
                }
            },
        }
    }

    fn finish(self) -> Vec<Record> {
        self.records
    }
}

/// FASTA reader producing every record of a stream in file order.
pub struct FastaParser;

impl FastaParser {
    /// Parse a FASTA file (plain or `.gz`).
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, FastaError> {
        let path = path.as_ref();
        let reader = open_input(path).map_err(|source| FastaError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let records = Self::parse_reader(reader)?;
        log::debug!("Parsed {} FASTA records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Parse FASTA data from any readable source.
    pub fn parse_reader<R: Read>(mut reader: R) -> Result<Vec<Record>, FastaError> {
        let mut machine = FastaStateMachine::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => machine.feed(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(machine.finish())
    }

    /// Parse an in-memory FASTA buffer.
    pub fn parse_bytes(data: &[u8]) -> Vec<Record> {
        let mut machine = FastaStateMachine::new();
        machine.feed(data);
        machine.finish()
    }
}
