//! Stdout report: banner, per-pair results and the final timing line

use std::io::{self, Write};

use pairalign_core::{
    to_cigar, AlignMode, AlignResult, BenchSummary, CigarFormat, NiceRenderer, PairOutcome,
    PathFormat,
};

#[derive(Debug, Clone, Copy)]
pub struct ReportSettings {
    pub format: PathFormat,
    pub silent: bool,
    /// Print only the N best-scoring pairs after the run (0 = print as they come).
    pub best: usize,
}

/// A pair's output, rendered ahead of time so it can be held for best-N.
struct Entry {
    index: usize,
    score: i32,
    text: Vec<u8>,
}

pub struct Reporter<W> {
    out: W,
    settings: ReportSettings,
    held: Vec<Entry>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, settings: ReportSettings) -> Self {
        Self {
            out,
            settings,
            held: Vec::new(),
        }
    }

    pub fn banner(&mut self, mode: AlignMode) -> io::Result<()> {
        writeln!(self.out, "Using {} alignment mode.", mode)
    }

    pub fn comparing(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nComparing queries to target...")?;
        self.out.flush()
    }

    pub fn record(&mut self, outcome: &PairOutcome<'_>) -> io::Result<()> {
        if self.settings.silent {
            return Ok(());
        }

        let mut text = Vec::new();
        write_outcome(&mut text, outcome, self.settings.format)?;

        if self.settings.best == 0 {
            return self.out.write_all(&text);
        }
        if outcome.result.is_found() {
            self.hold(Entry {
                index: outcome.index,
                score: outcome.result.score,
                text,
            });
        }
        Ok(())
    }

    /// Keep the held entries sorted by (score, input order), at most `best` of them.
    fn hold(&mut self, entry: Entry) {
        let key = (entry.score, entry.index);
        let at = self.held.partition_point(|held| (held.score, held.index) < key);
        if at < self.settings.best {
            self.held.insert(at, entry);
            self.held.truncate(self.settings.best);
        }
    }

    pub fn finish(&mut self, summary: &BenchSummary) -> io::Result<()> {
        for entry in self.held.drain(..) {
            self.out.write_all(&entry.text)?;
        }
        writeln!(self.out, "\nCpu time of searching: {:.6}", summary.seconds())?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `#<index>: <score>`, the locations if known, then the path.
fn write_outcome<W: Write>(out: &mut W, outcome: &PairOutcome<'_>, format: PathFormat) -> io::Result<()> {
    let result = outcome.result;
    write!(out, "#{}: {}", outcome.index, result.score)?;
    if let Some(locations) = format_locations(result) {
        write!(out, "  [{}]", locations)?;
    }
    writeln!(out)?;

    let script = match (&result.edit_script, result.is_found()) {
        (Some(script), true) => script,
        _ => return Ok(()),
    };

    match format {
        PathFormat::Nice => {
            let request = outcome.request;
            let mut renderer = NiceRenderer::new(out);
            renderer.write_alignment(
                request.query,
                request.target,
                script,
                result.anchor().unwrap_or(0),
                request.config.mode,
            )
        }
        PathFormat::CigarStandard => writeln!(out, "cigar: {}", to_cigar(script, CigarFormat::Standard)),
        PathFormat::CigarExtended => writeln!(out, "cigar: {}", to_cigar(script, CigarFormat::Extended)),
    }
}

fn format_locations(result: &AlignResult) -> Option<String> {
    let ends = result.end_locations.as_ref()?;
    let items: Vec<String> = match &result.start_locations {
        Some(starts) if starts.len() == ends.len() => starts
            .iter()
            .zip(ends)
            .map(|(start, end)| format!("{}-{}", start, end))
            .collect(),
        _ => ends.iter().map(|end| end.to_string()).collect(),
    };
    Some(items.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairalign_core::{AlignConfig, AlignRequest, AlignTask, EditOp, ScoreCutoff};
    use std::time::Duration;

    fn settings(format: PathFormat, best: usize) -> ReportSettings {
        ReportSettings {
            format,
            silent: false,
            best,
        }
    }

    fn found(score: i32) -> AlignResult {
        AlignResult {
            score,
            end_locations: None,
            start_locations: None,
            edit_script: None,
        }
    }

    fn record_all<W: Write>(reporter: &mut Reporter<W>, results: &[AlignResult]) {
        let request = AlignRequest::new(b"ACGT", b"ACGA", AlignConfig::default());
        for (index, result) in results.iter().enumerate() {
            reporter
                .record(&PairOutcome {
                    index,
                    request: &request,
                    result,
                })
                .unwrap();
        }
    }

    fn text(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_banner_and_timing() {
        let mut reporter = Reporter::new(Vec::new(), settings(PathFormat::Nice, 0));
        reporter.banner(AlignMode::Prefix).unwrap();
        reporter.comparing().unwrap();
        reporter
            .finish(&BenchSummary {
                elapsed: Duration::from_millis(1500),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(
            text(reporter),
            "Using SHW alignment mode.\n\nComparing queries to target...\n\nCpu time of searching: 1.500000\n"
        );
    }

    #[test]
    fn test_scores_and_locations() {
        let mut located = found(1);
        located.end_locations = Some(vec![3, 5]);
        located.start_locations = Some(vec![0, 2]);
        let mut ends_only = found(2);
        ends_only.end_locations = Some(vec![7]);

        let mut reporter = Reporter::new(Vec::new(), settings(PathFormat::Nice, 0));
        record_all(&mut reporter, &[located, ends_only, AlignResult::not_found()]);

        assert_eq!(text(reporter), "#0: 1  [0-3 2-5]\n#1: 2  [7]\n#2: -1\n");
    }

    #[test]
    fn test_cigar_output() {
        let config = AlignConfig::new(AlignMode::Global, AlignTask::Path, ScoreCutoff::UNBOUNDED);
        let request = AlignRequest::new(b"ACGT", b"ACGA", config);
        let mut result = found(1);
        result.edit_script = Some(vec![EditOp::Match, EditOp::Match, EditOp::Match, EditOp::Mismatch]);

        let mut reporter = Reporter::new(Vec::new(), settings(PathFormat::CigarExtended, 0));
        reporter
            .record(&PairOutcome {
                index: 0,
                request: &request,
                result: &result,
            })
            .unwrap();

        assert_eq!(text(reporter), "#0: 1\ncigar: 3=1X\n");
    }

    #[test]
    fn test_nice_output() {
        let config = AlignConfig::new(AlignMode::Global, AlignTask::Path, ScoreCutoff::UNBOUNDED);
        let request = AlignRequest::new(b"ACGT", b"ACGA", config);
        let mut result = found(1);
        result.edit_script = Some(vec![EditOp::Match, EditOp::Match, EditOp::Match, EditOp::Mismatch]);
        result.end_locations = Some(vec![3]);
        result.start_locations = Some(vec![0]);

        let mut reporter = Reporter::new(Vec::new(), settings(PathFormat::Nice, 0));
        reporter
            .record(&PairOutcome {
                index: 4,
                request: &request,
                result: &result,
            })
            .unwrap();

        assert_eq!(
            text(reporter),
            "#4: 1  [0-3]\nT: ACGA (0 - 3)\n   ||| \nQ: ACGT (0 - 3)\n\n"
        );
    }

    #[test]
    fn test_silent_prints_only_timing() {
        let mut reporter = Reporter::new(
            Vec::new(),
            ReportSettings {
                format: PathFormat::Nice,
                silent: true,
                best: 0,
            },
        );
        record_all(&mut reporter, &[found(3)]);
        reporter.finish(&BenchSummary::default()).unwrap();

        assert_eq!(text(reporter), "\nCpu time of searching: 0.000000\n");
    }

    #[test]
    fn test_best_n_held_until_finish() {
        let mut reporter = Reporter::new(Vec::new(), settings(PathFormat::Nice, 2));
        record_all(
            &mut reporter,
            &[found(4), found(1), AlignResult::not_found(), found(4), found(0)],
        );
        assert!(reporter.out.is_empty());

        reporter.finish(&BenchSummary::default()).unwrap();
        assert_eq!(
            text(reporter),
            "#4: 0\n#1: 1\n\nCpu time of searching: 0.000000\n"
        );
    }

    #[test]
    fn test_best_n_ties_keep_input_order() {
        let mut reporter = Reporter::new(Vec::new(), settings(PathFormat::Nice, 2));
        record_all(&mut reporter, &[found(2), found(2), found(2)]);
        reporter.finish(&BenchSummary::default()).unwrap();

        assert!(text(reporter).starts_with("#0: 2\n#1: 2\n\n"));
    }
}
