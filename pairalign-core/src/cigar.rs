//! CIGAR serialization of edit scripts

use crate::types::EditOp;

/// Which CIGAR dialect to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarFormat {
    /// `M` for matches and mismatches alike.
    Standard,
    /// `=` for matches, `X` for mismatches.
    Extended,
}

impl CigarFormat {
    fn code(&self, op: EditOp) -> char {
        match (self, op) {
            (CigarFormat::Standard, EditOp::Match | EditOp::Mismatch) => 'M',
            (CigarFormat::Extended, EditOp::Match) => '=',
            (CigarFormat::Extended, EditOp::Mismatch) => 'X',
            (_, EditOp::Insert) => 'I',
            (_, EditOp::Delete) => 'D',
        }
    }
}

/// Run-length encode `script`, e.g. `[=, =, X, I]` -> `2=1X1I`.
pub fn to_cigar(script: &[EditOp], format: CigarFormat) -> String {
    let mut cigar = String::new();
    let mut ops = script.iter().map(|&op| format.code(op));

    let Some(mut current) = ops.next() else {
        return cigar;
    };
    let mut run = 1usize;

    for code in ops {
        if code == current {
            run += 1;
        } else {
            cigar.push_str(&run.to_string());
            cigar.push(current);
            current = code;
            run = 1;
        }
    }
    cigar.push_str(&run.to_string());
    cigar.push(current);

    cigar
}
