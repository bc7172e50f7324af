use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Score reported when no alignment exists within the cutoff.
pub const NO_ALIGNMENT: i32 = -1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseValueError {
    #[error("Invalid mode: {0} (expected HW, NW or SHW)")]
    Mode(String),
    #[error("Invalid alignment path format: {0} (expected NICE, CIG_STD or CIG_EXT)")]
    PathFormat(String),
}

/// How gaps at the ends of the target are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlignMode {
    /// Global (Needleman-Wunsch): both ends of both sequences are anchored.
    #[default]
    #[serde(rename = "NW")]
    Global,
    /// Prefix: the target suffix after the alignment end is free.
    #[serde(rename = "SHW")]
    Prefix,
    /// Infix: target prefix and suffix are both free.
    #[serde(rename = "HW")]
    Infix,
}

impl AlignMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignMode::Global => "NW",
            AlignMode::Prefix => "SHW",
            AlignMode::Infix => "HW",
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlignMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NW" => Ok(AlignMode::Global),
            "SHW" => Ok(AlignMode::Prefix),
            "HW" => Ok(AlignMode::Infix),
            other => Err(ParseValueError::Mode(other.to_string())),
        }
    }
}

/// Requested output granularity. Ordered: each task includes the work of the
/// ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AlignTask {
    #[default]
    Distance,
    Location,
    Path,
}

impl AlignTask {
    /// Path wins over locations, locations over plain distance.
    pub fn from_flags(find_path: bool, find_locations: bool) -> Self {
        if find_path {
            AlignTask::Path
        } else if find_locations {
            AlignTask::Location
        } else {
            AlignTask::Distance
        }
    }

    pub fn wants_locations(&self) -> bool {
        *self >= AlignTask::Location
    }

    pub fn wants_path(&self) -> bool {
        *self == AlignTask::Path
    }
}

/// Maximum edit distance the engine may report. Unbounded when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoreCutoff(Option<u32>);

impl ScoreCutoff {
    pub const UNBOUNDED: ScoreCutoff = ScoreCutoff(None);

    pub fn bounded(k: u32) -> Self {
        ScoreCutoff(Some(k))
    }

    /// Negative values (the `-1` sentinel included) mean unbounded.
    pub fn from_k(k: i64) -> Self {
        match u32::try_from(k) {
            Ok(k) => ScoreCutoff(Some(k)),
            Err(_) if k < 0 => ScoreCutoff(None),
            Err(_) => ScoreCutoff(Some(u32::MAX)),
        }
    }

    pub fn get(&self) -> Option<u32> {
        self.0
    }

    pub fn is_unbounded(&self) -> bool {
        self.0.is_none()
    }

    pub fn admits(&self, score: u32) -> bool {
        self.0.map_or(true, |k| score <= k)
    }

    /// Lower the bound to `k` if that is tighter than the current one.
    pub fn tightened_to(self, k: u32) -> Self {
        match self.0 {
            Some(current) if current <= k => self,
            _ => ScoreCutoff(Some(k)),
        }
    }
}

impl fmt::Display for ScoreCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(k) => write!(f, "{}", k),
            None => f.write_str("-1"),
        }
    }
}

/// One symbol-level step of an alignment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    Match,
    Mismatch,
    /// Query symbol aligned to a gap in the target.
    Insert,
    /// Target symbol aligned to a gap in the query.
    Delete,
}

impl EditOp {
    pub fn consumes_target(&self) -> bool {
        !matches!(self, EditOp::Insert)
    }

    pub fn consumes_query(&self) -> bool {
        !matches!(self, EditOp::Delete)
    }
}

/// How an alignment path is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PathFormat {
    #[default]
    #[serde(rename = "NICE")]
    Nice,
    #[serde(rename = "CIG_STD")]
    CigarStandard,
    #[serde(rename = "CIG_EXT")]
    CigarExtended,
}

impl PathFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathFormat::Nice => "NICE",
            PathFormat::CigarStandard => "CIG_STD",
            PathFormat::CigarExtended => "CIG_EXT",
        }
    }
}

impl fmt::Display for PathFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathFormat {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NICE" => Ok(PathFormat::Nice),
            "CIG_STD" => Ok(PathFormat::CigarStandard),
            "CIG_EXT" => Ok(PathFormat::CigarExtended),
            other => Err(ParseValueError::PathFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignConfig {
    pub mode: AlignMode,
    pub task: AlignTask,
    pub cutoff: ScoreCutoff,
}

impl AlignConfig {
    pub fn new(mode: AlignMode, task: AlignTask, cutoff: ScoreCutoff) -> Self {
        Self { mode, task, cutoff }
    }
}

/// A single query/target comparison handed to an engine. The sequences are
/// borrowed for the duration of the call only.
#[derive(Debug, Clone, Copy)]
pub struct AlignRequest<'a> {
    pub query: &'a [u8],
    pub target: &'a [u8],
    pub config: AlignConfig,
}

impl<'a> AlignRequest<'a> {
    pub fn new(query: &'a [u8], target: &'a [u8], config: AlignConfig) -> Self {
        Self { query, target, config }
    }

    /// Both sequences must carry at least one symbol.
    pub fn is_well_formed(&self) -> bool {
        !self.query.is_empty() && !self.target.is_empty()
    }
}

/// Outcome of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignResult {
    /// Edit distance, or [`NO_ALIGNMENT`] when it exceeds the cutoff.
    pub score: i32,
    /// Target positions where best alignments end. Present for
    /// [`AlignTask::Location`] and above.
    pub end_locations: Option<Vec<usize>>,
    /// Start position for each end location, same order.
    pub start_locations: Option<Vec<usize>>,
    /// Present only for [`AlignTask::Path`].
    pub edit_script: Option<Vec<EditOp>>,
}

impl AlignResult {
    pub fn not_found() -> Self {
        Self {
            score: NO_ALIGNMENT,
            end_locations: None,
            start_locations: None,
            edit_script: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.score != NO_ALIGNMENT
    }

    /// End position of the first reported alignment.
    pub fn anchor(&self) -> Option<usize> {
        self.end_locations.as_ref().and_then(|ends| ends.first().copied())
    }
}

/// A named FASTA sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl Record {
    pub fn new(name: String) -> Self {
        Self {
            name,
            sequence: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
