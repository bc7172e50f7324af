use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod error;
mod report;

use config::Config;
use error::{report_error, CliError, CliResult};
use pairalign_core::{
    AlignConfig, AlignMode, AlignTask, BenchSettings, BenchmarkDriver, EditDistanceEngine,
    PairReader, PathFormat, ScoreCutoff,
};
use report::{ReportSettings, Reporter};

#[derive(Parser, Debug)]
#[command(name = "pairalign")]
#[command(about = "Pairwise edit-distance alignment benchmark")]
#[command(version)]
#[command(long_about = "
Aligns every query/target pair of a paired-line file and reports scores,
locations and alignment paths together with the time spent searching.

Each pair is two lines; the first byte of each line is a marker and is
ignored (e.g. '>ACGT' then '<ACGA'). Gzipped input ('.gz') is accepted.

Examples:
  pairalign pairs.txt
  pairalign -m HW -k 10 -p -f CIG_EXT pairs.txt
  pairalign -s -r 100 pairs.txt.gz
")]
pub struct Cli {
    /// Paired-line query/target file
    #[arg(required_unless_present = "example_config")]
    pub queries: Option<PathBuf>,

    /// Target file (accepted for compatibility; targets come from the pairs file)
    pub target: Option<PathBuf>,

    /// Alignment mode [default: NW]
    #[arg(short = 'm', value_name = "HW|NW|SHW")]
    pub mode: Option<String>,

    /// Report only the N best-scoring pairs; 0 reports all [default: 0]
    #[arg(short = 'n', value_name = "N")]
    pub best: Option<usize>,

    /// Pairs with score > K are reported as -1; -1 disables the cutoff [default: -1]
    #[arg(short = 'k', value_name = "K", allow_negative_numbers = true)]
    pub score_cutoff: Option<i64>,

    /// Alignment path format, used with -p [default: NICE]
    #[arg(short = 'f', value_name = "NICE|CIG_STD|CIG_EXT")]
    pub format: Option<String>,

    /// Silent mode: no score or alignment output
    #[arg(short = 's')]
    pub silent: bool,

    /// Find and print the alignment path
    #[arg(short = 'p')]
    pub path: bool,

    /// Find and print start and end locations
    #[arg(short = 'l')]
    pub locations: bool,

    /// Repeat each alignment N times, for timing [default: 1]
    #[arg(short = 'r', value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeats: Option<u32>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path [default: ./pairalign.toml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the default configuration file and exit
    #[arg(long)]
    pub example_config: bool,
}

/// Flags merged over the configuration file.
#[derive(Debug, Clone, PartialEq)]
struct RunOptions {
    queries: PathBuf,
    mode: AlignMode,
    task: AlignTask,
    cutoff: ScoreCutoff,
    repeats: u32,
    best: usize,
    format: PathFormat,
    silent: bool,
}

impl RunOptions {
    fn resolve(cli: &Cli, config: &Config) -> CliResult<Self> {
        let queries = cli
            .queries
            .clone()
            .ok_or_else(|| CliError::usage("Missing <QUERIES> argument"))?;

        let format = match &cli.format {
            Some(format) => format.parse::<PathFormat>()?,
            None => config.output.format,
        };
        let mode = match &cli.mode {
            Some(mode) => mode.parse::<AlignMode>()?,
            None => config.align.mode,
        };

        Ok(Self {
            queries,
            mode,
            task: AlignTask::from_flags(cli.path, cli.locations),
            cutoff: ScoreCutoff::from_k(cli.score_cutoff.unwrap_or(config.align.score_cutoff)),
            repeats: cli.repeats.unwrap_or(config.align.repeats),
            best: cli.best.unwrap_or(config.align.best),
            format,
            silent: cli.silent || config.output.silent,
        })
    }

    fn bench_settings(&self) -> BenchSettings {
        let config = AlignConfig::new(self.mode, self.task, self.cutoff);
        BenchSettings::new(config, self.repeats).with_best(self.best)
    }

    fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            format: self.format,
            silent: self.silent,
            best: self.best,
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = Config::load(cli.config.as_deref())?;

    if cli.example_config {
        print!("{}", Config::example_toml()?);
        return Ok(());
    }

    let options = RunOptions::resolve(cli, &config)?;
    log::debug!("Resolved options: {:?}", options);
    if let Some(target) = &cli.target {
        log::info!(
            "Ignoring target file {}: targets are read from {}",
            target.display(),
            options.queries.display()
        );
    }

    let stdout = io::stdout();
    let mut reporter = Reporter::new(BufWriter::new(stdout.lock()), options.report_settings());
    reporter.banner(options.mode)?;

    let mut pairs = PairReader::from_path(&options.queries)
        .map_err(|source| CliError::open(options.queries.clone(), source))?;

    reporter.comparing()?;
    let driver = BenchmarkDriver::new(EditDistanceEngine::new(), options.bench_settings());
    let summary = driver.run(&mut pairs, |outcome| reporter.record(outcome))?;
    reporter.finish(&summary)?;

    if summary.skipped > 0 {
        log::warn!("{} of {} pairs were skipped", summary.skipped, summary.pairs);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures.
            let code = if err.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
            let _ = err.print();
            return code;
        }
    };

    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}
