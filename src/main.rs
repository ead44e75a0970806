//! ensavg - ensemble mean and standard error for simulation output

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ensemble_average::config::{Binning, Config, MissingValue, OutputDestination, OutputFormat};
use ensemble_average::output::{emit, OutputFactory};
use ensemble_average::pipeline::{run_all, DatasetOutcome};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Average same-named .dat files across simulation runs
#[derive(Parser, Debug)]
#[command(name = "ensavg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset file names to average (default: every .dat in the first run directory)
    datasets: Vec<String>,

    /// Directory containing one subdirectory per run
    #[arg(short, long, default_value = "_input")]
    input_dir: PathBuf,

    /// Replace missing values with 0. Set this option for frequency data.
    #[arg(short = 'f', long = "fill-zero", conflicts_with = "fill")]
    fill_zero: bool,

    /// Replace missing values with VALUE instead of skipping the run
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    fill: Option<f64>,

    /// Datasets always treated as frequency data (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAME")]
    frequency: Vec<String>,

    /// Take binning with bin size BINSIZE
    #[arg(short = 'b', long = "binning", value_name = "BINSIZE")]
    binning: Option<f64>,

    /// Take logarithmic binning with the base of logarithm BINBASE (default: 2)
    #[arg(
        short = 'l',
        long = "log-binning",
        value_name = "BINBASE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "2"
    )]
    log_binning: Option<f64>,

    /// Sum binned values and divide by bin width instead of averaging (needs -b or -l)
    #[arg(long)]
    histogram: bool,

    /// Output file name (single dataset only)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write one report per dataset into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: CliOutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1), // At least one dataset failed
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("ENSAVG_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: Cli) -> Result<Config> {
    let missing_value = match (cli.fill_zero, cli.fill) {
        (true, _) => MissingValue::Fallback(0.0),
        (false, Some(v)) => MissingValue::Fallback(v),
        (false, None) => MissingValue::Skip,
    };

    let binning = Binning::from_requests(cli.binning, cli.log_binning)
        .context("-b and -l options are incompatible")?;

    let output = match (cli.output, cli.output_dir) {
        (Some(file), _) => OutputDestination::File(file),
        (None, Some(dir)) => OutputDestination::Directory(dir),
        (None, None) => OutputDestination::Console,
    };

    let config = Config::new(cli.input_dir)
        .with_datasets(cli.datasets)
        .with_missing_value(missing_value)
        .with_frequency_datasets(cli.frequency)
        .with_binning(binning)
        .with_histogram(cli.histogram)
        .with_output(output)
        .with_output_format(cli.format.into());

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Returns whether every dataset succeeded
fn run(config: &Config) -> Result<bool> {
    let outcomes = run_all(config).context("Failed to prepare ensemble")?;
    let labelled = matches!(config.output, OutputDestination::Console) && outcomes.len() > 1;

    let mut all_ok = true;
    for outcome in outcomes {
        let name = outcome.name.clone();
        if let Err(e) = write_outcome(config, outcome, labelled) {
            eprintln!("Error: {:#}", e.context(format!("dataset {}", name)));
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn write_outcome(config: &Config, outcome: DatasetOutcome, labelled: bool) -> Result<()> {
    let result = outcome
        .result
        .with_context(|| format!("Failed to average {} runs", outcome.runs))?;

    let formatter = OutputFactory::create(config.output_format);
    let mut lines = formatter.render(&result)?;
    if labelled {
        lines.insert(0, format!("# {}", outcome.name));
    }

    emit(&lines, &config.output, &outcome.name)
        .with_context(|| format!("Failed to write report for {}", outcome.name))?;
    Ok(())
}
