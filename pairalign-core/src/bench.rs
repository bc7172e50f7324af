//! Benchmark driver
//!
//! Reads query/target pairs, turns each into one [`AlignRequest`], and runs
//! the engine on it a fixed number of times. Every result except the last one
//! of a pair is dropped inside its own iteration; the last one is handed to an
//! output callback and dropped before the next pair is read, so memory stays
//! flat however many repeats or pairs there are.
//!
//! Elapsed time is accumulated over the whole loop (reading, request building,
//! engine calls) but not over the output callback.

use std::collections::BinaryHeap;
use std::io::{self, BufRead};
use std::time::{Duration, Instant};

use crate::engine::AlignEngine;
use crate::io::PairReader;
use crate::types::{AlignConfig, AlignRequest, AlignResult, ScoreCutoff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchSettings {
    pub config: AlignConfig,
    /// Engine calls per pair, at least 1.
    pub repeats: u32,
    /// Keep only the N best scores when non-zero (see [`BestScores`]).
    pub best: usize,
}

impl BenchSettings {
    pub fn new(config: AlignConfig, repeats: u32) -> Self {
        Self {
            config,
            repeats: repeats.max(1),
            best: 0,
        }
    }

    pub fn with_best(mut self, best: usize) -> Self {
        self.best = best;
        self
    }
}

/// Pausable accumulating timer on the monotonic clock.
#[derive(Debug, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }
}

/// The N smallest scores seen so far.
///
/// Once full, the worst of them becomes the cutoff for later pairs: a pair
/// scoring above it could never make the list.
#[derive(Debug)]
pub struct BestScores {
    limit: usize,
    heap: BinaryHeap<u32>,
}

impl BestScores {
    /// `limit == 0` disables tracking.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            heap: BinaryHeap::with_capacity(limit),
        }
    }

    pub fn record(&mut self, score: u32) {
        if self.limit == 0 {
            return;
        }
        if self.heap.len() < self.limit {
            self.heap.push(score);
        } else if self.heap.peek().map_or(false, |&worst| score < worst) {
            self.heap.pop();
            self.heap.push(score);
        }
    }

    /// Worst kept score, only once `limit` scores are held.
    pub fn worst(&self) -> Option<u32> {
        if self.limit > 0 && self.heap.len() == self.limit {
            self.heap.peek().copied()
        } else {
            None
        }
    }

    /// `cutoff` narrowed to the worst kept score, if any.
    pub fn cutoff(&self, cutoff: ScoreCutoff) -> ScoreCutoff {
        match self.worst() {
            Some(worst) => cutoff.tightened_to(worst),
            None => cutoff,
        }
    }
}

/// What the output callback sees for each aligned pair.
#[derive(Debug)]
pub struct PairOutcome<'a> {
    /// 0-based position of the pair in the input.
    pub index: usize,
    pub request: &'a AlignRequest<'a>,
    pub result: &'a AlignResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchSummary {
    /// Pairs read, skipped ones included.
    pub pairs: usize,
    /// Pairs with an empty query or target.
    pub skipped: usize,
    pub invocations: u64,
    /// Pairs whose last result had a score within the cutoff.
    pub found: usize,
    pub elapsed: Duration,
}

impl BenchSummary {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

pub struct BenchmarkDriver<E> {
    engine: E,
    settings: BenchSettings,
}

impl<E: AlignEngine> BenchmarkDriver<E> {
    pub fn new(engine: E, settings: BenchSettings) -> Self {
        Self { engine, settings }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> &BenchSettings {
        &self.settings
    }

    /// Run every pair of `pairs` to exhaustion.
    ///
    /// `on_outcome` is called once per non-skipped pair with the last result;
    /// an error from it aborts the run.
    pub fn run<R, F>(&self, pairs: &mut PairReader<R>, mut on_outcome: F) -> io::Result<BenchSummary>
    where
        R: BufRead,
        F: FnMut(&PairOutcome<'_>) -> io::Result<()>,
    {
        let mut summary = BenchSummary::default();
        let mut best = BestScores::new(self.settings.best);
        let mut stopwatch = Stopwatch::new();

        log::info!(
            "Running {} engine: mode={}, task={:?}, cutoff={}, repeats={}",
            self.engine.name(),
            self.settings.config.mode,
            self.settings.config.task,
            self.settings.config.cutoff,
            self.settings.repeats
        );

        stopwatch.start();
        while let Some(pair) = pairs.read_pair()? {
            let index = summary.pairs;
            summary.pairs += 1;

            let config = AlignConfig {
                cutoff: best.cutoff(self.settings.config.cutoff),
                ..self.settings.config
            };
            let request = AlignRequest::new(pair.query_sequence(), pair.target_sequence(), config);
            if !request.is_well_formed() {
                log::warn!("Skipping pair #{}: query or target is empty", index);
                summary.skipped += 1;
                continue;
            }

            let result = self.align_repeatedly(&request);
            summary.invocations += u64::from(self.settings.repeats);

            if let Ok(score) = u32::try_from(result.score) {
                summary.found += 1;
                best.record(score);
            }
            log::debug!("Pair #{}: score {}", index, result.score);

            stopwatch.stop();
            on_outcome(&PairOutcome {
                index,
                request: &request,
                result: &result,
            })?;
            stopwatch.start();
        }
        stopwatch.stop();

        summary.elapsed = stopwatch.elapsed();
        log::info!(
            "Aligned {} pairs ({} skipped, {} engine calls) in {:.6}s",
            summary.pairs - summary.skipped,
            summary.skipped,
            summary.invocations,
            summary.seconds()
        );
        Ok(summary)
    }

    /// All but the last result are released inside their own iteration.
    fn align_repeatedly(&self, request: &AlignRequest<'_>) -> AlignResult {
        for _ in 1..self.settings.repeats {
            drop(self.engine.align(request));
        }
        self.engine.align(request)
    }
}
