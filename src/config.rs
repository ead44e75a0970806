//! Configuration handling for ensemble averaging

use std::path::PathBuf;

use crate::binning::{BinScheme, Reduction};
use crate::error::{EnsembleError, Result};

pub use crate::ensemble::MissingValue;

/// Output format for ensemble reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `key mean_1 error_1 mean_2 error_2 ...` per line
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Key rebinning requested for every run before aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Binning {
    #[default]
    None,
    Linear { bin_size: f64 },
    Logarithmic { base: f64 },
}

impl Binning {
    /// Resolve the linear and logarithmic requests, which are mutually exclusive
    pub fn from_requests(bin_size: Option<f64>, log_base: Option<f64>) -> Result<Self> {
        match (bin_size, log_base) {
            (Some(_), Some(_)) => Err(EnsembleError::config(
                "linear and logarithmic binning are mutually exclusive",
            )),
            (Some(bin_size), None) => Ok(Binning::Linear { bin_size }),
            (None, Some(base)) => Ok(Binning::Logarithmic { base }),
            (None, None) => Ok(Binning::None),
        }
    }

    /// Validated bin scheme, or `None` when no binning is requested
    pub fn scheme(&self) -> Result<Option<BinScheme>> {
        match *self {
            Binning::None => Ok(None),
            Binning::Linear { bin_size } => BinScheme::linear(bin_size).map(Some),
            Binning::Logarithmic { base } => BinScheme::logarithmic(base).map(Some),
        }
    }
}

/// Where reports are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputDestination {
    #[default]
    Console,
    /// A single named file; only valid for one dataset
    File(PathBuf),
    /// One file per dataset, named after the dataset
    Directory(PathBuf),
}

/// Configuration for an ensemble run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one subdirectory per run
    pub input_dir: PathBuf,
    /// Dataset file names to process; empty means discover them
    pub datasets: Vec<String>,
    /// Policy for keys a run does not have
    pub missing_value: MissingValue,
    /// Datasets that always fill missing values with zero
    pub frequency_datasets: Vec<String>,
    /// Key rebinning
    pub binning: Binning,
    /// Treat binned values as counts (sum / bin width) instead of averaging
    pub histogram: bool,
    /// Output destination
    pub output: OutputDestination,
    /// Output format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("_input"),
            datasets: Vec::new(),
            missing_value: MissingValue::default(),
            frequency_datasets: Vec::new(),
            binning: Binning::default(),
            histogram: false,
            output: OutputDestination::default(),
            output_format: OutputFormat::default(),
        }
    }
}

/// Per-dataset options handed to the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetOptions {
    pub missing_value: MissingValue,
    pub scheme: Option<BinScheme>,
    pub reduction: Reduction,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            missing_value: MissingValue::Skip,
            scheme: None,
            reduction: Reduction::Mean,
        }
    }
}

impl Config {
    /// Create a new Config reading runs from `input_dir`
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            ..Default::default()
        }
    }

    /// Set the datasets to process
    pub fn with_datasets(mut self, datasets: Vec<String>) -> Self {
        self.datasets = datasets;
        self
    }

    /// Set the missing-value policy
    pub fn with_missing_value(mut self, missing: MissingValue) -> Self {
        self.missing_value = missing;
        self
    }

    /// Set datasets treated as frequency data
    pub fn with_frequency_datasets(mut self, names: Vec<String>) -> Self {
        self.frequency_datasets = names;
        self
    }

    /// Set key binning
    pub fn with_binning(mut self, binning: Binning) -> Self {
        self.binning = binning;
        self
    }

    /// Enable histogram (density) reduction for binned data
    pub fn with_histogram(mut self, histogram: bool) -> Self {
        self.histogram = histogram;
        self
    }

    /// Set output destination
    pub fn with_output(mut self, output: OutputDestination) -> Self {
        self.output = output;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Check the configuration before any dataset is touched
    pub fn validate(&self) -> Result<()> {
        if self.histogram && self.binning == Binning::None {
            return Err(EnsembleError::config(
                "histogram mode needs linear or logarithmic binning",
            ));
        }
        self.binning.scheme()?;
        if let MissingValue::Fallback(v) = self.missing_value {
            if !v.is_finite() {
                return Err(EnsembleError::config(format!(
                    "missing-value fallback must be finite, got {}",
                    v
                )));
            }
        }
        Ok(())
    }

    /// Missing-value policy for one dataset
    pub fn missing_value_for(&self, dataset: &str) -> MissingValue {
        if self.frequency_datasets.iter().any(|n| n == dataset) {
            MissingValue::Fallback(0.0)
        } else {
            self.missing_value
        }
    }

    /// Options for one dataset
    pub fn dataset_options(&self, dataset: &str) -> Result<DatasetOptions> {
        Ok(DatasetOptions {
            missing_value: self.missing_value_for(dataset),
            scheme: self.binning.scheme()?,
            reduction: Reduction::from_histogram(self.histogram),
        })
    }
}
