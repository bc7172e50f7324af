//! Sequence ingestion for pairalign
//!
//! Two independent readers: the paired-line stream consumed by the benchmark
//! driver, and a multi-record FASTA parser. Both accept plain or gzipped
//! files through [`open_input`].

pub mod fasta;
pub mod pairs;

pub use fasta::{FastaError, FastaParser};
pub use pairs::{LinePair, PairReader};

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Open `path` for buffered reading, decompressing `.gz` files on the fly.
pub fn open_input<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if is_gzipped(path) {
        log::debug!("Reading {} as gzip", path.display());
        let decoder = MultiGzDecoder::new(file);
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)))
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}
