//! pairalign core library
//!
//! Sequence readers, the alignment engine contract, NICE/CIGAR rendering,
//! and the benchmark driver used by the `pairalign` CLI.

pub mod types;
pub mod io;
pub mod engine;
pub mod cigar;
pub mod render;
pub mod bench;

// Re-export commonly used types and functions
pub use types::{
    AlignConfig, AlignMode, AlignRequest, AlignResult, AlignTask, EditOp, PathFormat, Record,
    ScoreCutoff, NO_ALIGNMENT,
};
pub use io::{FastaError, FastaParser, LinePair, PairReader};
pub use engine::{AlignEngine, EditDistanceEngine};
pub use cigar::{to_cigar, CigarFormat};
pub use render::{render_alignment, NiceRenderer, RenderBlock, RenderError, BLOCK_WIDTH};
pub use bench::{BenchSettings, BenchSummary, BenchmarkDriver, PairOutcome, Stopwatch};

/// Version information for the pairalign core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
