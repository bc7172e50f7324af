//! Human-readable ("NICE") alignment rendering
//!
//! An edit script is cut into windows of [`BLOCK_WIDTH`] operations. Each
//! window becomes three lines: target symbols, match markers, and query
//! symbols, the sequence lines followed by the inclusive coordinate range
//! they cover:
//!
//! ```text
//! T: ACG-T (0 - 3)
//!    ||| |
//! Q: ACGGT (0 - 4)
//! ```

use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

use crate::types::{AlignMode, EditOp};

/// Operations per rendered block.
pub const BLOCK_WIDTH: usize = 50;

const GAP: u8 = b'-';
const MATCH_MARK: u8 = b'|';
const NO_MARK: u8 = b' ';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Edit script reads past the {sequence} (index {index}, length {length})")]
    ScriptOverrun {
        sequence: &'static str,
        index: i64,
        length: usize,
    },
}

/// Inclusive coordinate range printed after a sequence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordRange {
    pub start: i64,
    pub end: i64,
}

/// One rendered window of the alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBlock {
    pub target: Vec<u8>,
    pub markers: Vec<u8>,
    pub query: Vec<u8>,
    pub target_range: CoordRange,
    pub query_range: CoordRange,
}

impl fmt::Display for CoordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} - {})", self.start, self.end)
    }
}

impl fmt::Display for RenderBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "T: {} {}", String::from_utf8_lossy(&self.target), self.target_range)?;
        writeln!(f, "   {}", String::from_utf8_lossy(&self.markers))?;
        writeln!(f, "Q: {} {}", String::from_utf8_lossy(&self.query), self.query_range)?;
        writeln!(f)
    }
}

impl RenderBlock {
    /// Byte-exact output; sequence symbols are written as-is.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"T: ")?;
        out.write_all(&self.target)?;
        writeln!(out, " {}", self.target_range)?;

        out.write_all(b"   ")?;
        out.write_all(&self.markers)?;
        out.write_all(b"\n")?;

        out.write_all(b"Q: ")?;
        out.write_all(&self.query)?;
        writeln!(out, " {}", self.query_range)?;
        out.write_all(b"\n")
    }
}

/// Target cursor value before the first rendered symbol in infix mode:
/// the anchor (alignment end) minus every target-consuming operation.
pub fn infix_target_offset(script: &[EditOp], anchor: usize) -> i64 {
    let consumed = script.iter().filter(|op| op.consumes_target()).count();
    anchor as i64 - consumed as i64
}

/// Lay out `script` over `query` and `target` as a sequence of blocks.
///
/// `anchor` is the target position where the alignment ends; it only matters
/// in [`AlignMode::Infix`], where the alignment may start anywhere in the
/// target. Prefix and global alignments always start at target position 0.
pub fn render_alignment(
    query: &[u8],
    target: &[u8],
    script: &[EditOp],
    anchor: usize,
    mode: AlignMode,
) -> Result<Vec<RenderBlock>, RenderError> {
    let mut target_cursor = match mode {
        AlignMode::Infix => infix_target_offset(script, anchor),
        AlignMode::Global | AlignMode::Prefix => -1,
    };
    let mut query_cursor = -1i64;

    script
        .chunks(BLOCK_WIDTH)
        .map(|window| render_window(window, query, target, &mut target_cursor, &mut query_cursor))
        .collect()
}

/// Advance both cursors over one window and emit its three lines.
fn render_window(
    window: &[EditOp],
    query: &[u8],
    target: &[u8],
    target_cursor: &mut i64,
    query_cursor: &mut i64,
) -> Result<RenderBlock, RenderError> {
    let (target_line, target_range) =
        render_sequence_line(window, target, "target", target_cursor, EditOp::consumes_target)?;

    let markers = window
        .iter()
        .map(|op| if *op == EditOp::Match { MATCH_MARK } else { NO_MARK })
        .collect();

    let (query_line, query_range) =
        render_sequence_line(window, query, "query", query_cursor, EditOp::consumes_query)?;

    Ok(RenderBlock {
        target: target_line,
        markers,
        query: query_line,
        target_range,
        query_range,
    })
}

fn render_sequence_line(
    window: &[EditOp],
    sequence: &[u8],
    name: &'static str,
    cursor: &mut i64,
    consumes: fn(&EditOp) -> bool,
) -> Result<(Vec<u8>, CoordRange), RenderError> {
    let mut line = Vec::with_capacity(window.len());
    let mut first = *cursor;

    for (k, op) in window.iter().enumerate() {
        if consumes(op) {
            *cursor += 1;
            line.push(symbol_at(sequence, *cursor, name)?);
        } else {
            line.push(GAP);
        }
        if k == 0 {
            first = *cursor;
        }
    }

    let range = CoordRange {
        start: first.max(0),
        end: *cursor,
    };
    Ok((line, range))
}

fn symbol_at(sequence: &[u8], index: i64, name: &'static str) -> Result<u8, RenderError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| sequence.get(i).copied())
        .ok_or(RenderError::ScriptOverrun {
            sequence: name,
            index,
            length: sequence.len(),
        })
}

/// Writes NICE blocks to an output stream.
pub struct NiceRenderer<W> {
    out: W,
}

impl<W: Write> NiceRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_alignment(
        &mut self,
        query: &[u8],
        target: &[u8],
        script: &[EditOp],
        anchor: usize,
        mode: AlignMode,
    ) -> io::Result<()> {
        let blocks = render_alignment(query, target, script, anchor, mode)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        for block in &blocks {
            block.write_to(&mut self.out)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render straight into a `String`, replacing invalid UTF-8 symbols.
pub fn render_to_string(
    query: &[u8],
    target: &[u8],
    script: &[EditOp],
    anchor: usize,
    mode: AlignMode,
) -> Result<String, RenderError> {
    let blocks = render_alignment(query, target, script, anchor, mode)?;
    Ok(blocks.iter().map(|block| block.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use EditOp::*;

    #[test]
    fn test_layout_with_insertion() {
        let text = render_to_string(
            b"ACGGT",
            b"ACGT",
            &[Match, Match, Match, Insert, Match],
            3,
            AlignMode::Global,
        )
        .unwrap();

        assert_eq!(text, "T: ACG-T (0 - 3)\n   ||| |\nQ: ACGGT (0 - 4)\n\n");
    }

    #[test]
    fn test_mismatch_and_deletion_are_unmarked() {
        let blocks = render_alignment(
            b"AGT",
            b"ACCT",
            &[Match, Mismatch, Delete, Match],
            3,
            AlignMode::Global,
        )
        .unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].target, b"ACCT");
        assert_eq!(blocks[0].markers, b"|  |");
        assert_eq!(blocks[0].query, b"AG-T");
        assert_eq!(blocks[0].query_range, CoordRange { start: 0, end: 2 });
    }

    #[test]
    fn test_infix_offset() {
        let script = [Match, Match, Match];
        assert_eq!(infix_target_offset(&script, 4), 1);

        let blocks = render_alignment(b"ACT", b"CGACTGAC", &script, 4, AlignMode::Infix).unwrap();
        assert_eq!(blocks[0].target, b"ACT");
        assert_eq!(blocks[0].target_range, CoordRange { start: 2, end: 4 });
        assert_eq!(blocks[0].query_range, CoordRange { start: 0, end: 2 });
    }

    #[test]
    fn test_infix_offset_ignores_insertions() {
        let script = [Match, Insert, Match];
        assert_eq!(infix_target_offset(&script, 5), 3);
    }

    #[test]
    fn test_prefix_mode_ignores_anchor() {
        let blocks = render_alignment(b"AC", b"ACGG", &[Match, Match], 1, AlignMode::Prefix).unwrap();
        assert_eq!(blocks[0].target_range, CoordRange { start: 0, end: 1 });
    }

    #[test]
    fn test_leading_insertion_range_is_clamped() {
        let blocks = render_alignment(b"AC", b"C", &[Insert, Match], 0, AlignMode::Global).unwrap();

        assert_eq!(blocks[0].target, b"-C");
        assert_eq!(blocks[0].target_range, CoordRange { start: 0, end: 0 });
        assert_eq!(blocks[0].query_range, CoordRange { start: 0, end: 1 });
    }

    #[test]
    fn test_windows_of_fifty() {
        let sequence = vec![b'A'; 120];
        let script = vec![Match; 120];
        let blocks = render_alignment(&sequence, &sequence, &script, 119, AlignMode::Global).unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].target.len(), 50);
        assert_eq!(blocks[2].target.len(), 20);
        assert_eq!(blocks[1].target_range, CoordRange { start: 50, end: 99 });
        assert_eq!(blocks[2].query_range, CoordRange { start: 100, end: 119 });
    }

    #[test]
    fn test_script_longer_than_sequence() {
        let err = render_alignment(b"A", b"AA", &[Match, Match], 1, AlignMode::Global).unwrap_err();
        assert!(matches!(err, RenderError::ScriptOverrun { sequence: "query", .. }));
    }

    #[test]
    fn test_empty_script_renders_nothing() {
        assert!(render_alignment(b"A", b"A", &[], 0, AlignMode::Global).unwrap().is_empty());
    }

    #[test]
    fn test_nice_renderer_writes_blocks() {
        let mut renderer = NiceRenderer::new(Vec::new());
        renderer
            .write_alignment(b"AC", b"AC", &[Match, Match], 1, AlignMode::Global)
            .unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.starts_with("T: AC (0 - 1)\n   ||\n"));
    }
}
