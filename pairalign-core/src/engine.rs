//! Alignment engine contract
//!
//! The benchmark driver and the renderer only depend on [`AlignEngine`]. The
//! bundled [`EditDistanceEngine`] is a straightforward unit-cost dynamic
//! programming implementation supporting the three alignment modes, a score
//! cutoff, end/start locations, and traceback of the full edit script.

use std::cmp::min;

use crate::types::{AlignMode, AlignRequest, AlignResult, EditOp};

/// Something that can align a query against a target.
///
/// Implementations must not keep references to the request's sequences past
/// the call. The returned result is owned by the caller and released by drop.
pub trait AlignEngine {
    fn align(&self, request: &AlignRequest<'_>) -> AlignResult;
    fn name(&self) -> &str;
}

impl<E: AlignEngine + ?Sized> AlignEngine for &E {
    fn align(&self, request: &AlignRequest<'_>) -> AlignResult {
        (**self).align(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Levenshtein distance by full dynamic programming.
///
/// Distance-only requests keep two rows; paths and infix start locations keep
/// the whole `(m + 1) x (n + 1)` cost matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistanceEngine;

impl EditDistanceEngine {
    pub fn new() -> Self {
        Self
    }
}

impl AlignEngine for EditDistanceEngine {
    fn align(&self, request: &AlignRequest<'_>) -> AlignResult {
        let AlignRequest { query, target, config } = *request;

        if target.is_empty() {
            return align_to_empty_target(query.len(), request);
        }

        let keep_matrix = config.task.wants_path()
            || (config.task.wants_locations() && config.mode == AlignMode::Infix);

        let fill = match fill_matrix(query, target, config.mode, config.cutoff.get(), keep_matrix) {
            Some(fill) => fill,
            None => return AlignResult::not_found(),
        };

        let (score, end_columns) = best_end_columns(&fill.last_row, config.mode);
        if !config.cutoff.admits(score) {
            return AlignResult::not_found();
        }

        let mut result = AlignResult {
            score: score as i32,
            end_locations: None,
            start_locations: None,
            edit_script: None,
        };

        if config.task.wants_locations() {
            let starts = match (&fill.matrix, config.mode) {
                (Some(matrix), AlignMode::Infix) => end_columns
                    .iter()
                    .map(|&col| matrix.traceback(query, target, config.mode, col).0)
                    .collect(),
                _ => vec![0; end_columns.len()],
            };
            result.end_locations = Some(end_columns.iter().map(|&col| col - 1).collect());
            result.start_locations = Some(starts);
        }

        if config.task.wants_path() {
            if let Some(matrix) = &fill.matrix {
                let (_, script) = matrix.traceback(query, target, config.mode, end_columns[0]);
                result.edit_script = Some(script);
            }
        }

        result
    }

    fn name(&self) -> &str {
        "edit-distance-dp"
    }
}

fn align_to_empty_target(query_len: usize, request: &AlignRequest<'_>) -> AlignResult {
    let score = query_len as u32;
    if !request.config.cutoff.admits(score) {
        return AlignResult::not_found();
    }

    let task = request.config.task;
    AlignResult {
        score: score as i32,
        end_locations: task.wants_locations().then(Vec::new),
        start_locations: task.wants_locations().then(Vec::new),
        edit_script: task.wants_path().then(|| vec![EditOp::Insert; query_len]),
    }
}

struct Fill {
    last_row: Vec<u32>,
    matrix: Option<CostMatrix>,
}

/// Row-major `(m + 1) x (n + 1)` costs; row `i` covers the first `i` query symbols.
struct CostMatrix {
    cols: usize,
    cells: Vec<u32>,
}

impl CostMatrix {
    fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.cols + col]
    }

    /// Walk back from `(m, end_col)`. Returns the target start index and the
    /// edit script in forward order. Diagonal moves win ties, then insertions.
    fn traceback(
        &self,
        query: &[u8],
        target: &[u8],
        mode: AlignMode,
        end_col: usize,
    ) -> (usize, Vec<EditOp>) {
        let mut ops = Vec::with_capacity(query.len() + end_col);
        let mut i = query.len();
        let mut j = end_col;

        loop {
            if i == 0 && (j == 0 || mode == AlignMode::Infix) {
                break;
            }
            if i == 0 {
                ops.push(EditOp::Delete);
                j -= 1;
                continue;
            }
            if j == 0 {
                ops.push(EditOp::Insert);
                i -= 1;
                continue;
            }

            let cost = self.get(i, j);
            let same = query[i - 1] == target[j - 1];
            if cost == self.get(i - 1, j - 1) + u32::from(!same) {
                ops.push(if same { EditOp::Match } else { EditOp::Mismatch });
                i -= 1;
                j -= 1;
            } else if cost == self.get(i - 1, j) + 1 {
                ops.push(EditOp::Insert);
                i -= 1;
            } else {
                ops.push(EditOp::Delete);
                j -= 1;
            }
        }

        ops.reverse();
        (j, ops)
    }
}

/// Fill the DP rows. Returns `None` as soon as a whole row exceeds `cutoff`:
/// row minima never decrease, so no later cell can come back under it.
fn fill_matrix(
    query: &[u8],
    target: &[u8],
    mode: AlignMode,
    cutoff: Option<u32>,
    keep_matrix: bool,
) -> Option<Fill> {
    let cols = target.len() + 1;
    let mut prev: Vec<u32> = match mode {
        AlignMode::Infix => vec![0; cols],
        AlignMode::Global | AlignMode::Prefix => (0..cols as u32).collect(),
    };
    let mut cur = vec![0u32; cols];

    let mut cells = if keep_matrix {
        let mut cells = Vec::with_capacity(cols * (query.len() + 1));
        cells.extend_from_slice(&prev);
        Some(cells)
    } else {
        None
    };

    for (i, &q) in query.iter().enumerate() {
        cur[0] = i as u32 + 1;
        let mut row_min = cur[0];
        for (j, &t) in target.iter().enumerate() {
            let diagonal = prev[j] + u32::from(q != t);
            let value = min(diagonal, min(prev[j + 1], cur[j]) + 1);
            cur[j + 1] = value;
            row_min = row_min.min(value);
        }

        if let Some(k) = cutoff {
            if row_min > k {
                log::trace!("Row {} minimum {} exceeds cutoff {}", i + 1, row_min, k);
                return None;
            }
        }

        if let Some(cells) = cells.as_mut() {
            cells.extend_from_slice(&cur);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    Some(Fill {
        last_row: prev,
        matrix: cells.map(|cells| CostMatrix { cols, cells }),
    })
}

/// Best score on the last row and every column (1-based) reaching it.
fn best_end_columns(last_row: &[u32], mode: AlignMode) -> (u32, Vec<usize>) {
    let n = last_row.len() - 1;
    match mode {
        AlignMode::Global => (last_row[n], vec![n]),
        AlignMode::Prefix | AlignMode::Infix => {
            let best = last_row[1..].iter().copied().min().unwrap_or(last_row[0]);
            let columns = (1..=n).filter(|&j| last_row[j] == best).collect();
            (best, columns)
        }
    }
}
